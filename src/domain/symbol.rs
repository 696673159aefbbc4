//! Symbol parsing for function symbols as printed by the analysis,
//! e.g. `pkg.Func`, `(*pkg.Type).Method`, `(pkg.Type).Method`.
//!
//! Purely textual: the symbol table is never consulted.

/// Drop the trailing `.<name>` from a symbol. Symbols without a dot are
/// returned whole.
pub fn without_func(symbol: &str) -> &str {
    match symbol.rfind('.') {
        Some(dot) => &symbol[..dot],
        None => symbol,
    }
}

/// The package (or type owner) a function symbol is declared in.
///
/// Never fails: input that does not follow the receiver syntax degrades to
/// the plain "everything before the last dot" rule.
pub fn declaring_scope(symbol: &str) -> &str {
    let declared = without_func(symbol);

    if !declared.starts_with('(') {
        return declared;
    }

    let start = if declared.starts_with("(*") { 2 } else { 1 };
    match declared.rfind('.') {
        Some(dot) if dot >= start => &declared[start..dot],
        // `(T).M` or `(*T).M`: receiver type with no package qualifier
        _ => declared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_function() {
        assert_eq!(declaring_scope("pkg.Func"), "pkg");
        assert_eq!(declaring_scope("github.com/acme/tool/store.Open"), "github.com/acme/tool/store");
    }

    #[test]
    fn test_pointer_receiver() {
        assert_eq!(declaring_scope("(*pkg.Type).Method"), "pkg");
        assert_eq!(
            declaring_scope("(*github.com/acme/tool/store.DB).Close"),
            "github.com/acme/tool/store"
        );
    }

    #[test]
    fn test_value_receiver() {
        assert_eq!(declaring_scope("(pkg.Type).Method"), "pkg");
    }

    #[test]
    fn test_no_dot() {
        assert_eq!(declaring_scope("justAName"), "justAName");
        assert_eq!(declaring_scope(""), "");
    }

    #[test]
    fn test_synthetic_symbols_are_opaque() {
        // closures and bound methods keep their suffix text
        assert_eq!(declaring_scope("main.main$1"), "main");
        assert_eq!(declaring_scope("(*pkg.T).Run$bound"), "pkg");
        assert_eq!(declaring_scope("gopkg.in/yaml.v3.Unmarshal"), "gopkg.in/yaml.v3");
    }

    #[test]
    fn test_unqualified_receiver_degrades() {
        assert_eq!(declaring_scope("(*T).M"), "(*T)");
        assert_eq!(declaring_scope("(T).M"), "(T)");
    }

    #[test]
    fn test_without_func() {
        assert_eq!(without_func("pkg.Func"), "pkg");
        assert_eq!(without_func("(*pkg.T).M"), "(*pkg.T)");
        assert_eq!(without_func("plain"), "plain");
    }
}

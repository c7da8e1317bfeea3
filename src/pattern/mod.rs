// Mon Oct 19 2026 - Alex

pub mod error;
pub mod pattern;
pub mod compiler;
pub mod cache;

pub use error::PatternError;
pub use pattern::{CompiledPattern, NamedPattern, OptionalByte};
pub use compiler::{compile, PatternCompiler, DEFAULT_DELIMITER, DEFAULT_WILDCARD};
pub use cache::PatternCache;

#[doc(hidden)]
pub use once_cell::sync::OnceCell as __OnceCell;

/// Compiles a signature literal the first time this call site runs and hands
/// back the same `&'static CompiledPattern` afterwards.
///
/// ```ignore
/// let prologue = pattern!("55 8B EC 83 EC ?")?;
/// ```
#[macro_export]
macro_rules! pattern {
    ($sig:literal) => {{
        static CELL: $crate::pattern::__OnceCell<
            ::std::result::Result<$crate::pattern::CompiledPattern, $crate::pattern::PatternError>,
        > = $crate::pattern::__OnceCell::new();
        CELL.get_or_init(|| $crate::pattern::compile($sig))
            .as_ref()
            .map_err(::std::clone::Clone::clone)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prologue() -> Result<&'static CompiledPattern, PatternError> {
        crate::pattern!("55 8B EC 83 EC ?")
    }

    #[test]
    fn test_macro_matches_runtime_compile() {
        let cached = crate::pattern!("00 ? 22 ?? 44 ? 66 ?? 88 ? AA ?? CC ? EE ??").unwrap();
        assert_eq!(*cached, compile("00 ? 22 ?? 44 ? 66 ?? 88 ? AA ?? CC ? EE ??").unwrap());
    }

    #[test]
    fn test_macro_compiles_once() {
        let first = prologue().unwrap();
        let second = prologue().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_macro_reports_errors() {
        assert_eq!(crate::pattern!("?? 8B"), Err(PatternError::Anchor));
        assert!(crate::pattern!("00 ?1").unwrap_err().is_syntax());
    }
}

/// Lazily-compiled static [`regex::Regex`] from a literal pattern.
///
/// The pattern is compiled on first use and shared for the lifetime of the
/// process. Only for patterns known at compile time; dynamically built
/// patterns (like the scanner's keyword alternation) go through
/// `regex::Regex::new` directly.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

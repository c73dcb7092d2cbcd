use itertools::Itertools;

#[macro_export]
macro_rules! try_match {
    ($e:expr, $(|)? $pattern:pat $( if $guard:expr )? $(,)? => $v:expr) => {
        match $e {
            $pattern $( if $guard )? => Some($v),
            _ => None,
        }
    }
}

/// The separator between a generic class name and its type arguments: `list@int`.
pub const TYPE_DELIMITER: char = '@';

pub fn is_compound(type_name: &str) -> bool {
    type_name.contains(TYPE_DELIMITER)
}

/// Splits `base@arg1@arg2` into `("base", ["arg1", "arg2"])`.
///
/// A name without the delimiter yields no arguments.
pub fn split_compound(type_name: &str) -> (&str, Vec<&str>) {
    let mut parts = type_name.split(TYPE_DELIMITER);
    let base = parts.next().unwrap_or_default();

    (base, parts.collect())
}

pub fn join_compound<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    parts
        .into_iter()
        .map(|part| part.as_ref().to_owned())
        .join(&TYPE_DELIMITER.to_string())
}

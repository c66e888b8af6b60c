//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for code enums.
///
/// Parsing is case-insensitive and treats `-` and spaces as `_`, so
/// `"In Progress"`, `"in-progress"` and `"IN_PROGRESS"` all match `"in_progress"`.
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     MyEnum,
///     HelpdeskError::invalid_status,
///     {
///         Variant1 => "variant1",
///         Variant2 => "variant_2",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_ctor:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::HelpdeskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match $crate::macros::normalize_code(s).as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_ctor(s.to_string())),
                }
            }
        }
    };
}

/// Normalize a free-form code: trimmed, lowercased, with `-` and spaces as `_`.
pub fn normalize_code(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

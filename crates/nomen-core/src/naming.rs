//! Case conversion for output file names
//!
//! Type names themselves are never re-cased; they come verbatim from the
//! object model. These helpers only shape the file names the writer derives
//! from namespaces.

use std::path::MAIN_SEPARATOR;

use crate::settings::FileNameCasing;

/// Convert an identifier to lowerCamelCase
///
/// A leading run of capitals is lowered as a unit, keeping the last capital
/// when it starts the next word.
///
/// # Examples
/// ```
/// use nomen_core::naming::to_lower_camel_case;
/// assert_eq!(to_lower_camel_case("Collections"), "collections");
/// assert_eq!(to_lower_camel_case("MyApp"), "myApp");
/// assert_eq!(to_lower_camel_case("IOStream"), "ioStream");
/// assert_eq!(to_lower_camel_case("UI"), "ui");
/// ```
pub fn to_lower_camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let leading_upper = chars.iter().take_while(|c| c.is_uppercase()).count();

    let lower_until = match leading_upper {
        0 => return name.to_string(),
        n if n == chars.len() => n,
        1 => 1,
        // "IOStream": keep the 'S' that starts "Stream"
        n if chars[n].is_lowercase() => n - 1,
        n => n,
    };

    chars
        .iter()
        .enumerate()
        .flat_map(|(idx, c)| {
            if idx < lower_until {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![*c]
            }
        })
        .collect()
}

/// Apply the configured casing to a file name derived from a namespace
///
/// Camel casing splits on every separator actually present (`.`, `/`, `\`
/// and the platform separator), converts each segment independently and
/// rejoins with the same separator.
pub fn apply_file_name_casing(file_name: &str, casing: FileNameCasing) -> String {
    match casing {
        FileNameCasing::None => file_name.to_string(),
        FileNameCasing::Lowercase => file_name.to_lowercase(),
        FileNameCasing::CamelCase => {
            let mut separators: Vec<char> = Vec::new();
            for separator in ['.', MAIN_SEPARATOR, '\\', '/'] {
                if file_name.contains(separator) && !separators.contains(&separator) {
                    separators.push(separator);
                }
            }

            if separators.is_empty() {
                return to_lower_camel_case(file_name);
            }

            let mut result = file_name.to_string();
            for separator in separators {
                result = result
                    .split(separator)
                    .map(to_lower_camel_case)
                    .collect::<Vec<_>>()
                    .join(&separator.to_string());
            }
            result
        }
    }
}

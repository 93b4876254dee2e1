//! Tab-completion over registered names.

use super::{ConsoleRegistry, VarKind, tokenize_string};

/// One completion candidate for the input line.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSuggestion {
    /// Text that replaces the input when the suggestion is accepted.
    /// Variables get a trailing space so a value can be typed right away.
    pub completion: String,
    /// `name <arg> <arg>`, for display.
    pub label: String,
    pub description: String,
    pub kind: VarKind,
    /// Byte indices into `label` that matched the typed text.
    pub highlighted_indices: Vec<usize>,
}

impl ConsoleRegistry {
    /// Suggestions for the first token of `input`.
    ///
    /// Names containing the token (ignoring case) are returned, prefix
    /// matches first, then by match position, then alphabetically. A blank
    /// input has no suggestions.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy_convar_console::core::ConsoleRegistry;
    ///
    /// let registry = ConsoleRegistry::with_builtins();
    /// let names: Vec<_> = registry
    ///     .suggestions("CL")
    ///     .into_iter()
    ///     .map(|s| s.completion)
    ///     .collect();
    ///
    /// assert_eq!(names, vec!["clear", "cls"]);
    /// ```
    pub fn suggestions(&self, input: &str) -> Vec<CompletionSuggestion> {
        let Some(&query) = tokenize_string(input).first() else {
            return Vec::new();
        };

        self.matching_names(query)
            .into_iter()
            .filter_map(|(name, result)| {
                let command = self.get_command(name)?;

                let mut label = name.to_string();
                for argument in command.get_arguments() {
                    label.push_str(&format!(" <{argument}>"));
                }

                let mut completion = name.to_string();
                if command.is_variable() {
                    completion.push(' ');
                }

                Some(CompletionSuggestion {
                    completion,
                    label,
                    description: command.get_description().to_string(),
                    kind: command.kind(),
                    highlighted_indices: result.indices,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assign_variable;

    fn registry() -> ConsoleRegistry {
        let mut registry = ConsoleRegistry::with_builtins();
        registry
            .register_float_var("sv_gravity", 800.0, "World gravity", assign_variable, &[], true)
            .unwrap();
        registry
            .register_int_var("cl_fov", 90, "Field of view", assign_variable, &[], true)
            .unwrap();
        registry
    }

    #[test]
    fn test_variable_gets_trailing_space() {
        let suggestions = registry().suggestions("grav");

        assert_eq!(suggestions.len(), 1);
        let suggestion = &suggestions[0];
        assert_eq!(suggestion.completion, "sv_gravity ");
        assert_eq!(suggestion.kind, VarKind::Float);
        assert_eq!(suggestion.description, "World gravity");
        assert_eq!(suggestion.highlighted_indices, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_command_label_lists_arguments() {
        let suggestions = registry().suggestions("sa");

        assert_eq!(suggestions[0].completion, "say");
        assert_eq!(suggestions[0].label, "say <message_string>");
    }

    #[test]
    fn test_only_first_token_is_matched() {
        let names: Vec<_> = registry()
            .suggestions("cl_ 45")
            .into_iter()
            .map(|s| s.completion)
            .collect();
        assert_eq!(names, vec!["cl_fov "]);
    }

    #[test]
    fn test_ordering() {
        let names: Vec<_> = registry()
            .suggestions("v")
            .into_iter()
            .map(|s| s.completion)
            .collect();

        // No prefix match for "v"; earlier positions first
        assert_eq!(names, vec!["cvarlist", "sv_gravity ", "cl_fov "]);
    }

    #[test]
    fn test_blank_input() {
        assert!(registry().suggestions("   ").is_empty());
        assert!(registry().suggestions("zzz").is_empty());
    }
}

//! declaration rendering
//!
//! [`DeclarationBlock`] renders one textual member or type declaration:
//! optional doc comment, name, optional-marker, combination token,
//! content, terminator. inputs are taken verbatim; escaping is the
//! caller's concern. builder methods take the value and return a new
//! one, so a block can never leak state across loop iterations.

/// builder for one rendered declaration
#[derive(Debug, Clone)]
pub struct DeclarationBlock {
    comment: Option<String>,
    name: String,
    content: String,
    required: bool,
    combination: String,
    terminator: String,
}

impl DeclarationBlock {
    pub fn new() -> Self {
        Self {
            comment: None,
            name: String::new(),
            content: String::new(),
            required: true,
            combination: ":".to_string(),
            terminator: ";".to_string(),
        }
    }

    /// doc comment line, rendered as `/** ... */`
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.is_empty()).then_some(comment);
        self
    }

    /// declaration name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// value or type expression
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// required flag; default true. a non-required declaration renders
    /// a `?` marker after the name
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// combination token between name and content; default `:`
    pub fn with_combination(mut self, combination: impl Into<String>) -> Self {
        self.combination = combination.into();
        self
    }

    /// terminator after the content; default `;`
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    /// render the declaration text
    pub fn render(&self) -> String {
        let mut result = String::new();

        if let Some(comment) = &self.comment {
            result.push_str(&format!("/** {comment} */\n"));
        }

        let marker = if self.required { "" } else { "?" };
        result.push_str(&format!(
            "{} {}{} {}{}",
            self.name, marker, self.combination, self.content, self.terminator
        ));

        result
    }
}

impl Default for DeclarationBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_required_member() {
        let text = DeclarationBlock::new()
            .with_name("id")
            .with_content("number")
            .render();
        assert_eq!(text, "id : number;");
    }

    #[test]
    fn test_render_optional_member_with_comment() {
        let text = DeclarationBlock::new()
            .with_name("nickname")
            .with_content("string")
            .with_required(false)
            .with_comment("display name")
            .render();
        assert_eq!(text, "/** display name */\nnickname ?: string;");
    }

    #[test]
    fn test_render_enum_member_punctuation() {
        let text = DeclarationBlock::new()
            .with_name("Red")
            .with_content("\"RED\"")
            .with_combination("=")
            .with_terminator(",")
            .render();
        assert_eq!(text, "Red = \"RED\",");
    }

    #[test]
    fn test_empty_comment_is_dropped() {
        let text = DeclarationBlock::new()
            .with_name("x")
            .with_content("y")
            .with_comment("")
            .render();
        assert_eq!(text, "x : y;");
    }

    #[test]
    fn test_builder_returns_fresh_values() {
        let base = DeclarationBlock::new().with_name("a").with_content("one");
        let other = base.clone().with_name("b").with_content("two");
        assert_eq!(base.render(), "a : one;");
        assert_eq!(other.render(), "b : two;");
    }
}

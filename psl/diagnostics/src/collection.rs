use crate::{DatamodelError, DatamodelWarning};

/// One entry of a [`Diagnostics`] collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Error(DatamodelError),
    Warning(DatamodelWarning),
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::Error(_))
    }

    pub fn message(&self) -> String {
        match self {
            Diagnostic::Error(err) => err.message(),
            Diagnostic::Warning(warning) => warning.message().to_owned(),
        }
    }

    pub fn span(&self) -> crate::Span {
        match self {
            Diagnostic::Error(err) => err.span(),
            Diagnostic::Warning(warning) => warning.span(),
        }
    }
}

/// Represents a list of validation errors and warnings.
///
/// This is used to accumulate multiple errors and warnings during validation.
/// It is used to not error out early and instead show multiple errors at once.
/// Entries keep the order they were pushed in, errors and warnings interleaved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    error_count: usize,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn push_error(&mut self, err: DatamodelError) {
        self.error_count += 1;
        self.entries.push(Diagnostic::Error(err))
    }

    pub fn push_warning(&mut self, warning: DatamodelWarning) {
        self.entries.push(Diagnostic::Warning(warning))
    }

    pub fn push_opt_error(&mut self, err: Option<DatamodelError>) {
        if let Some(err) = err {
            self.push_error(err);
        }
    }

    /// Returns true, if there is at least one error in this collection.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.entries.len() > self.error_count
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries, in the order they were pushed.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &DatamodelError> + '_ {
        self.entries.iter().filter_map(|d| match d {
            Diagnostic::Error(err) => Some(err),
            Diagnostic::Warning(_) => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DatamodelWarning> + '_ {
        self.entries.iter().filter_map(|d| match d {
            Diagnostic::Warning(warning) => Some(warning),
            Diagnostic::Error(_) => None,
        })
    }

    /// Moves every entry of `other` to the end of this collection.
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.error_count += other.error_count;
        other.error_count = 0;
        self.entries.append(&mut other.entries);
    }

    pub fn to_result(&mut self) -> Result<(), Diagnostics> {
        if self.has_errors() {
            Err(std::mem::take(self))
        } else {
            Ok(())
        }
    }

    pub fn to_pretty_string(&self, file_name: &str, datamodel_string: &str) -> String {
        let mut message: Vec<u8> = Vec::new();

        for err in self.errors() {
            // Writing into a Vec cannot fail.
            let _ = err.pretty_print(&mut message, file_name, datamodel_string);
        }

        String::from_utf8_lossy(&message).into_owned()
    }

    pub fn warnings_to_pretty_string(&self, file_name: &str, datamodel_string: &str) -> String {
        let mut message: Vec<u8> = Vec::new();

        for warn in self.warnings() {
            let _ = warn.pretty_print(&mut message, file_name, datamodel_string);
        }

        String::from_utf8_lossy(&message).into_owned()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg: Vec<String> = self.errors().map(|e| e.to_string()).collect();
        f.write_str(&msg.join("\n"))
    }
}

impl From<DatamodelError> for Diagnostics {
    fn from(error: DatamodelError) -> Self {
        let mut col = Diagnostics::new();
        col.push_error(error);
        col
    }
}

impl From<DatamodelWarning> for Diagnostics {
    fn from(warning: DatamodelWarning) -> Self {
        let mut col = Diagnostics::new();
        col.push_warning(warning);
        col
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn keeps_push_order_across_severities() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push_warning(DatamodelWarning::new("first", Span::empty()));
        diagnostics.push_error(DatamodelError::new_static("second", Span::empty()));
        diagnostics.push_warning(DatamodelWarning::new("third", Span::empty()));

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(diagnostics.warnings().count(), 2);
    }

    #[test]
    fn to_result_only_fails_on_errors() {
        let mut diagnostics = Diagnostics::from(DatamodelWarning::new("careful", Span::empty()));
        assert!(diagnostics.to_result().is_ok());

        diagnostics.push_error(DatamodelError::new_static("broken", Span::empty()));
        let err = diagnostics.to_result().unwrap_err();

        assert_eq!(err.len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn append_keeps_the_error_count() {
        let mut a = Diagnostics::from(DatamodelError::new_static("a", Span::empty()));
        let mut b = Diagnostics::from(DatamodelError::new_static("b", Span::empty()));
        a.append(&mut b);

        assert_eq!(a.errors().count(), 2);
        assert!(!b.has_errors());
    }
}

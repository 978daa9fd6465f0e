use std::fmt;

/// Logical type of a filterable column.
///
/// Drives value coercion when a [`Criterion`](coursekit_criteria::Criterion)
/// is translated. [`FieldKind::Id`] marks identifier and tenant-reference
/// columns, which get the lenient identifier coercion rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    I64,
    F64,
    Bool,
    Id,
    DateTimeUtc,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "String"),
            FieldKind::I64 => write!(f, "I64"),
            FieldKind::F64 => write!(f, "F64"),
            FieldKind::Bool => write!(f, "Bool"),
            FieldKind::Id => write!(f, "Id"),
            FieldKind::DateTimeUtc => write!(f, "DateTimeUtc"),
        }
    }
}

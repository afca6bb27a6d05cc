//! Type-to-command resolution.
//!
//! A [`Command`] tells the emitter which state-bundle accessor pair saves and
//! restores a field. [`BundleResolver`] is the stock strategy table; hosts
//! targeting a different container plug in their own [`TypeResolver`].

use std::fmt;

use thiserror::Error;

use crate::model::DeclaredType;

const PARCELABLE: &str = "android.os.Parcelable";
const SERIALIZABLE: &str = "java.io.Serializable";
const CHAR_SEQUENCE: &str = "java.lang.CharSequence";
const CHAR_SEQUENCE_ARRAY: &str = "java.lang.CharSequence[]";
const ENUM: &str = "java.lang.Enum";

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

const SCALARS: &[(&str, Strategy)] = &[
    ("boolean", Strategy::Boolean),
    ("byte", Strategy::Byte),
    ("char", Strategy::Char),
    ("short", Strategy::Short),
    ("int", Strategy::Int),
    ("long", Strategy::Long),
    ("float", Strategy::Float),
    ("double", Strategy::Double),
    ("java.lang.String", Strategy::String),
    (CHAR_SEQUENCE, Strategy::CharSequence),
    ("android.os.Bundle", Strategy::Bundle),
];

const ARRAYS: &[(&str, Strategy)] = &[
    ("boolean", Strategy::BooleanArray),
    ("byte", Strategy::ByteArray),
    ("char", Strategy::CharArray),
    ("short", Strategy::ShortArray),
    ("int", Strategy::IntArray),
    ("long", Strategy::LongArray),
    ("float", Strategy::FloatArray),
    ("double", Strategy::DoubleArray),
    ("java.lang.String", Strategy::StringArray),
    (CHAR_SEQUENCE, Strategy::CharSequenceArray),
];

const ARRAY_LISTS: &[(&str, Strategy)] = &[
    ("java.lang.Integer", Strategy::IntegerArrayList),
    ("java.lang.String", Strategy::StringArrayList),
    (CHAR_SEQUENCE, Strategy::CharSequenceArrayList),
];

// JDK classes known to implement `java.io.Serializable`; hosts rarely list
// platform hierarchies in full.
const SERIALIZABLE_CLASSES: &[&str] = &[
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.lang.Number",
    "java.lang.String",
    "java.math.BigDecimal",
    "java.math.BigInteger",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.HashMap",
    "java.util.LinkedHashMap",
    "java.util.TreeMap",
    "java.util.HashSet",
    "java.util.LinkedHashSet",
    "java.util.TreeSet",
    "java.util.Date",
    "java.util.UUID",
];

/// Bundle accessor family used to persist one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `putBoolean` / `getBoolean`.
    Boolean,
    /// `putBooleanArray` / `getBooleanArray`.
    BooleanArray,
    /// `putByte` / `getByte`.
    Byte,
    /// `putByteArray` / `getByteArray`.
    ByteArray,
    /// `putChar` / `getChar`.
    Char,
    /// `putCharArray` / `getCharArray`.
    CharArray,
    /// `putShort` / `getShort`.
    Short,
    /// `putShortArray` / `getShortArray`.
    ShortArray,
    /// `putInt` / `getInt`.
    Int,
    /// `putIntArray` / `getIntArray`.
    IntArray,
    /// `putLong` / `getLong`.
    Long,
    /// `putLongArray` / `getLongArray`.
    LongArray,
    /// `putFloat` / `getFloat`.
    Float,
    /// `putFloatArray` / `getFloatArray`.
    FloatArray,
    /// `putDouble` / `getDouble`.
    Double,
    /// `putDoubleArray` / `getDoubleArray`.
    DoubleArray,
    /// `putString` / `getString`.
    String,
    /// `putStringArray` / `getStringArray`.
    StringArray,
    /// `putCharSequence` / `getCharSequence`.
    CharSequence,
    /// `putCharSequenceArray` / `getCharSequenceArray`.
    CharSequenceArray,
    /// `putBundle` / `getBundle`.
    Bundle,
    /// `putParcelable` / `getParcelable`.
    Parcelable,
    /// `putParcelableArray` / `getParcelableArray`.
    ParcelableArray,
    /// `putParcelableArrayList` / `getParcelableArrayList`.
    ParcelableArrayList,
    /// `putSparseParcelableArray` / `getSparseParcelableArray`.
    SparseParcelableArray,
    /// `putIntegerArrayList` / `getIntegerArrayList`.
    IntegerArrayList,
    /// `putStringArrayList` / `getStringArrayList`.
    StringArrayList,
    /// `putCharSequenceArrayList` / `getCharSequenceArrayList`.
    CharSequenceArrayList,
    /// `putSerializable` / `getSerializable`.
    Serializable,
}

impl Strategy {
    /// Accessor suffix shared by the `put` and `get` methods.
    #[must_use]
    pub const fn accessor(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::BooleanArray => "BooleanArray",
            Self::Byte => "Byte",
            Self::ByteArray => "ByteArray",
            Self::Char => "Char",
            Self::CharArray => "CharArray",
            Self::Short => "Short",
            Self::ShortArray => "ShortArray",
            Self::Int => "Int",
            Self::IntArray => "IntArray",
            Self::Long => "Long",
            Self::LongArray => "LongArray",
            Self::Float => "Float",
            Self::FloatArray => "FloatArray",
            Self::Double => "Double",
            Self::DoubleArray => "DoubleArray",
            Self::String => "String",
            Self::StringArray => "StringArray",
            Self::CharSequence => "CharSequence",
            Self::CharSequenceArray => "CharSequenceArray",
            Self::Bundle => "Bundle",
            Self::Parcelable => "Parcelable",
            Self::ParcelableArray => "ParcelableArray",
            Self::ParcelableArrayList => "ParcelableArrayList",
            Self::SparseParcelableArray => "SparseParcelableArray",
            Self::IntegerArrayList => "IntegerArrayList",
            Self::StringArrayList => "StringArrayList",
            Self::CharSequenceArrayList => "CharSequenceArrayList",
            Self::Serializable => "Serializable",
        }
    }

    /// Reports whether the getter's return type is wider than any field
    /// stored with this strategy.
    #[must_use]
    pub const fn requires_cast(self) -> bool {
        matches!(self, Self::ParcelableArray | Self::Serializable)
    }
}

/// Opaque token describing how one field is saved and restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command {
    strategy: Strategy,
}

impl Command {
    /// Creates a command for `strategy`.
    #[must_use]
    pub const fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Strategy the command was resolved to.
    #[must_use]
    pub const fn strategy(self) -> Strategy {
        self.strategy
    }

    /// Name of the method writing the value into the container.
    #[must_use]
    pub fn put_method(self) -> String {
        format!("put{}", self.strategy.accessor())
    }

    /// Name of the method reading the value back.
    #[must_use]
    pub fn get_method(self) -> String {
        format!("get{}", self.strategy.accessor())
    }

    /// Reports whether the restored value must be cast to `declared`.
    ///
    /// `getCharSequence` and `getCharSequenceArray` return the interface
    /// type, so fields declared as an implementing class need a cast too.
    #[must_use]
    pub fn requires_cast(self, declared: &DeclaredType) -> bool {
        match self.strategy {
            Strategy::CharSequence => declared.to_string() != CHAR_SEQUENCE,
            Strategy::CharSequenceArray => declared.to_string() != CHAR_SEQUENCE_ARRAY,
            strategy => strategy.requires_cast(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy.accessor())
    }
}

/// Failure to classify a field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolutionError {
    /// No persistence strategy exists for the type.
    #[error(
        "type {0} cannot be saved in a bundle; use a primitive, String, CharSequence, \
         Bundle, Parcelable or Serializable type"
    )]
    Unsupported(String),
}

/// Classifies declared types into persistence commands.
///
/// Implementations must be pure: the same type always yields the same
/// result and resolving has no side effects.
pub trait TypeResolver {
    /// Resolves the command for `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when `ty` has no persistence strategy.
    fn resolve(&self, ty: &DeclaredType) -> Result<Command, ResolutionError>;
}

impl<F> TypeResolver for F
where
    F: Fn(&DeclaredType) -> Result<Command, ResolutionError>,
{
    fn resolve(&self, ty: &DeclaredType) -> Result<Command, ResolutionError> {
        self(ty)
    }
}

/// Strategy table mirroring the Android `Bundle` API.
///
/// Specific accessors win over `Parcelable`, which wins over
/// `Serializable`, so `String` uses `putString` even though it is also
/// serialisable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleResolver;

impl TypeResolver for BundleResolver {
    fn resolve(&self, ty: &DeclaredType) -> Result<Command, ResolutionError> {
        classify(ty)
            .map(Command::new)
            .ok_or_else(|| ResolutionError::Unsupported(ty.to_string()))
    }
}

fn classify(ty: &DeclaredType) -> Option<Strategy> {
    let specific = match ty.component() {
        None => classify_scalar(ty),
        Some(component) if !component.is_array() => classify_array(&component),
        Some(_) => None,
    };
    specific.or_else(|| is_serializable(ty).then_some(Strategy::Serializable))
}

fn classify_scalar(ty: &DeclaredType) -> Option<Strategy> {
    if ty.arguments().is_empty()
        && let Some(strategy) = lookup(SCALARS, ty.name())
    {
        return Some(strategy);
    }
    match ty.name() {
        "java.util.ArrayList" => {
            let element = single_argument(ty)?;
            lookup(ARRAY_LISTS, element.name()).or_else(|| {
                element
                    .is_subtype_of(PARCELABLE)
                    .then_some(Strategy::ParcelableArrayList)
            })
        }
        "android.util.SparseArray" => single_argument(ty)?
            .is_subtype_of(PARCELABLE)
            .then_some(Strategy::SparseParcelableArray),
        _ if ty.is_subtype_of(PARCELABLE) => Some(Strategy::Parcelable),
        _ if ty.is_subtype_of(CHAR_SEQUENCE) => Some(Strategy::CharSequence),
        _ => None,
    }
}

fn classify_array(component: &DeclaredType) -> Option<Strategy> {
    if component.arguments().is_empty()
        && let Some(strategy) = lookup(ARRAYS, component.name())
    {
        return Some(strategy);
    }
    if component.is_subtype_of(PARCELABLE) {
        Some(Strategy::ParcelableArray)
    } else if component.is_subtype_of(CHAR_SEQUENCE) {
        Some(Strategy::CharSequenceArray)
    } else {
        None
    }
}

fn is_serializable(ty: &DeclaredType) -> bool {
    if let Some(component) = ty.component() {
        return PRIMITIVES.contains(&component.name()) || is_serializable(&component);
    }
    SERIALIZABLE_CLASSES.contains(&ty.name())
        || ty.is_subtype_of(SERIALIZABLE)
        || ty.is_subtype_of(ENUM)
}

fn single_argument(ty: &DeclaredType) -> Option<&DeclaredType> {
    match ty.arguments() {
        [argument] => Some(argument),
        _ => None,
    }
}

fn lookup(table: &[(&str, Strategy)], name: &str) -> Option<Strategy> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, strategy)| strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_resolvers() {
        let resolver = |_: &DeclaredType| -> Result<Command, ResolutionError> {
            Ok(Command::new(Strategy::Int))
        };
        let command = resolver.resolve(&DeclaredType::new("anything"));
        assert_eq!(command, Ok(Command::new(Strategy::Int)));
    }

    #[test]
    fn command_names_accessor_pair() {
        let command = Command::new(Strategy::ParcelableArrayList);
        assert_eq!(command.put_method(), "putParcelableArrayList");
        assert_eq!(command.get_method(), "getParcelableArrayList");
        assert!(!command.requires_cast(&DeclaredType::new("java.util.ArrayList")));
        let date = DeclaredType::new("java.util.Date");
        assert!(Command::new(Strategy::Serializable).requires_cast(&date));
    }

    #[test]
    fn char_sequence_getters_cast_to_implementing_classes() {
        let scalar = Command::new(Strategy::CharSequence);
        assert!(!scalar.requires_cast(&DeclaredType::new(CHAR_SEQUENCE)));
        assert!(scalar.requires_cast(&DeclaredType::new("com.example.Label")));

        let array = Command::new(Strategy::CharSequenceArray);
        let interfaces = DeclaredType::new(CHAR_SEQUENCE).with_dimensions(1);
        let labels = DeclaredType::new("com.example.Label").with_dimensions(1);
        assert!(!array.requires_cast(&interfaces));
        assert!(array.requires_cast(&labels));
    }
}

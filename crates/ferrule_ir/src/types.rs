//! The static type lattice of analyzed expressions.
//!
//! Types mirror the Java type system as far as constant folding needs it:
//! the eight primitive types, their boxed wrappers, `String`, the `null`
//! type, `Object`, and resolved class types. Class types carry their
//! supertypes so subtype queries need no external lookup.

use ferrule_common::Ident;
use serde::{Deserialize, Serialize};

/// One of the eight primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `byte`, 8-bit signed.
    Byte,
    /// `short`, 16-bit signed.
    Short,
    /// `char`, 16-bit unsigned UTF-16 code unit.
    Char,
    /// `int`, 32-bit signed.
    Int,
    /// `long`, 64-bit signed.
    Long,
    /// `float`, 32-bit IEEE 754.
    Float,
    /// `double`, 64-bit IEEE 754.
    Double,
}

impl PrimitiveType {
    /// Returns the keyword naming this type in source code.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Returns the simple name of the wrapper class, e.g. `Integer` for `int`.
    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::Short => "Short",
            PrimitiveType::Char => "Character",
            PrimitiveType::Int => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
        }
    }

    /// Every primitive except `boolean` is numeric.
    pub fn is_numeric(self) -> bool {
        self != PrimitiveType::Boolean
    }

    /// `byte`, `short`, `char`, `int`, and `long`.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte
                | PrimitiveType::Short
                | PrimitiveType::Char
                | PrimitiveType::Int
                | PrimitiveType::Long
        )
    }

    /// `float` and `double`.
    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveType::Float | PrimitiveType::Double)
    }

    /// Returns the width of the value representation in bits, `None` for `boolean`.
    pub fn bit_width(self) -> Option<u32> {
        match self {
            PrimitiveType::Boolean => None,
            PrimitiveType::Byte => Some(8),
            PrimitiveType::Short | PrimitiveType::Char => Some(16),
            PrimitiveType::Int | PrimitiveType::Float => Some(32),
            PrimitiveType::Long | PrimitiveType::Double => Some(64),
        }
    }
}

/// A static type of an expression or a cast target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A primitive type.
    Primitive(PrimitiveType),
    /// The wrapper class of a primitive type (`Integer`, `Character`, ...).
    Boxed(PrimitiveType),
    /// `java.lang.String`.
    String,
    /// The type of the `null` literal.
    Null,
    /// `java.lang.Object`.
    Object,
    /// A resolved class or interface type.
    Class {
        /// Simple name of the class.
        name: Ident,
        /// Direct supertypes (excluding `Object`, which is implied).
        supertypes: Vec<Type>,
    },
}

impl Type {
    /// `boolean`
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveType::Boolean);
    /// `byte`
    pub const BYTE: Type = Type::Primitive(PrimitiveType::Byte);
    /// `short`
    pub const SHORT: Type = Type::Primitive(PrimitiveType::Short);
    /// `char`
    pub const CHAR: Type = Type::Primitive(PrimitiveType::Char);
    /// `int`
    pub const INT: Type = Type::Primitive(PrimitiveType::Int);
    /// `long`
    pub const LONG: Type = Type::Primitive(PrimitiveType::Long);
    /// `float`
    pub const FLOAT: Type = Type::Primitive(PrimitiveType::Float);
    /// `double`
    pub const DOUBLE: Type = Type::Primitive(PrimitiveType::Double);

    /// Returns the primitive kind if this is a primitive type.
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the primitive kind of a primitive or boxed type.
    pub fn unboxed_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) | Type::Boxed(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the unboxed form: `Integer` becomes `int`, every other type is returned as is.
    pub fn unbox(&self) -> Type {
        match self {
            Type::Boxed(p) => Type::Primitive(*p),
            other => other.clone(),
        }
    }

    /// Returns the boxed form: `int` becomes `Integer`, every other type is returned as is.
    pub fn boxed(&self) -> Type {
        match self {
            Type::Primitive(p) => Type::Boxed(*p),
            other => other.clone(),
        }
    }

    /// Returns `true` for the eight primitive types.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Returns `true` for wrapper classes of primitive types.
    pub fn is_boxed(&self) -> bool {
        matches!(self, Type::Boxed(_))
    }

    /// Returns `true` for a primitive numeric type (boxed types are not numeric until unboxed).
    pub fn is_numeric(&self) -> bool {
        self.as_primitive().is_some_and(PrimitiveType::is_numeric)
    }

    /// Returns `true` for a primitive integral type.
    pub fn is_integral(&self) -> bool {
        self.as_primitive().is_some_and(PrimitiveType::is_integral)
    }

    /// Returns `true` for `float`, `double`, `Float`, and `Double`.
    pub fn is_floating(&self) -> bool {
        self.unboxed_primitive().is_some_and(PrimitiveType::is_floating)
    }

    /// Returns `true` for `boolean` and `Boolean`.
    pub fn is_boolean(&self) -> bool {
        self.unboxed_primitive() == Some(PrimitiveType::Boolean)
    }

    /// Checks the subtype relation between reference types.
    ///
    /// Every type is a subtype of itself. The null type is a subtype of every
    /// reference type, every reference type is a subtype of `Object`, and a
    /// class type is a subtype of everything its supertypes are subtypes of.
    /// Primitive types are only related to themselves.
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }
        if self.is_primitive() || other.is_primitive() {
            return false;
        }
        match (self, other) {
            (Type::Null, _) | (_, Type::Object) => true,
            (Type::Class { supertypes, .. }, _) => {
                supertypes.iter().any(|sup| sup.is_subtype_of(other))
            }
            _ => false,
        }
    }
}

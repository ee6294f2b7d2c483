//! The type lattice used by expression analysis and overload resolution.

use std::fmt::Display;

use crate::token::TermKind;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,
    Struct(String),
    /// element type and statically known length, if any.
    Array(Box<Type>, Option<usize>),
}

impl Type {
    /// maps a type keyword terminal to its type, if it is one.
    pub fn from_term(term: TermKind) -> Option<Type> {
        match term {
            TermKind::Void => Some(Type::Void),
            TermKind::Float => Some(Type::Float),
            TermKind::Int => Some(Type::Int),
            TermKind::Bool => Some(Type::Bool),
            TermKind::Vec2 => Some(Type::Vec2),
            TermKind::Vec3 => Some(Type::Vec3),
            TermKind::Vec4 => Some(Type::Vec4),
            TermKind::Mat2 => Some(Type::Mat2),
            TermKind::Mat3 => Some(Type::Mat3),
            TermKind::Mat4 => Some(Type::Mat4),
            TermKind::Sampler2D => Some(Type::Sampler2D),
            TermKind::SamplerCube => Some(Type::SamplerCube),
            _ => None,
        }
    }

    /// number of components of a float vector type.
    pub fn vec_size(&self) -> Option<usize> {
        match self {
            Type::Vec2 => Some(2),
            Type::Vec3 => Some(3),
            Type::Vec4 => Some(4),
            _ => None,
        }
    }

    pub fn vec_of(size: usize) -> Option<Type> {
        match size {
            1 => Some(Type::Float),
            2 => Some(Type::Vec2),
            3 => Some(Type::Vec3),
            4 => Some(Type::Vec4),
            _ => None,
        }
    }

    /// `float` or a float vector: the set generic builtin placeholders range over.
    pub fn is_gen_float(&self) -> bool {
        matches!(self, Type::Float | Type::Vec2 | Type::Vec3 | Type::Vec4)
    }

    /// result type of indexing into this type.
    pub fn element(&self) -> Option<Type> {
        match self {
            Type::Vec2 | Type::Vec3 | Type::Vec4 => Some(Type::Float),
            Type::Mat2 => Some(Type::Vec2),
            Type::Mat3 => Some(Type::Vec3),
            Type::Mat4 => Some(Type::Vec4),
            Type::Array(elem, _) => Some((**elem).clone()),
            _ => None,
        }
    }

    /// result type of a swizzle like `.xyz` on this type, if valid.
    pub fn swizzle(&self, components: &str) -> Option<Type> {
        let size = self.vec_size()?;
        if components.is_empty() || components.len() > 4 {
            return None;
        }
        let sets: [&str; 3] = ["xyzw", "rgba", "stpq"];
        let valid = sets.iter().any(|set| {
            components
                .chars()
                .all(|c| set.find(c).map(|i| i < size).unwrap_or(false))
        });
        if valid {
            Type::vec_of(components.len())
        } else {
            None
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Bool => f.write_str("bool"),
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Vec2 => f.write_str("vec2"),
            Type::Vec3 => f.write_str("vec3"),
            Type::Vec4 => f.write_str("vec4"),
            Type::Mat2 => f.write_str("mat2"),
            Type::Mat3 => f.write_str("mat3"),
            Type::Mat4 => f.write_str("mat4"),
            Type::Sampler2D => f.write_str("sampler2D"),
            Type::SamplerCube => f.write_str("samplerCube"),
            Type::Struct(name) => f.write_str(name),
            Type::Array(elem, Some(n)) => write!(f, "{elem}[{n}]"),
            Type::Array(elem, None) => write!(f, "{elem}[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swizzles() {
        assert_eq!(Type::Vec4.swizzle("xyz"), Some(Type::Vec3));
        assert_eq!(Type::Vec4.swizzle("rgba"), Some(Type::Vec4));
        assert_eq!(Type::Vec2.swizzle("x"), Some(Type::Float));
        // `z` is out of range for a vec2
        assert_eq!(Type::Vec2.swizzle("z"), None);
        // mixed component sets are invalid
        assert_eq!(Type::Vec4.swizzle("xg"), None);
        assert_eq!(Type::Float.swizzle("x"), None);
    }

    #[test]
    fn indexing() {
        assert_eq!(Type::Vec3.element(), Some(Type::Float));
        assert_eq!(Type::Mat4.element(), Some(Type::Vec4));
        assert_eq!(Type::Array(Box::new(Type::Int), Some(3)).element(), Some(Type::Int));
        assert_eq!(Type::Float.element(), None);
    }
}

//! The builtin intrinsic registry.
//!
//! Intrinsic signatures use generic placeholders: a placeholder unifies with
//! the first concrete argument type it meets and must then match every later
//! occurrence of the same placeholder in that signature. Builtins are matched
//! before user overloads and independently of them.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::sema::types::Type;

/// A parameter slot of an intrinsic signature.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamTy {
    Exact(Type),
    /// generic placeholder over `float | vec2 | vec3 | vec4`, identified by id.
    Gen(u8),
}

/// The return slot of an intrinsic signature.
#[derive(Clone, Debug, PartialEq)]
pub enum RetTy {
    Exact(Type),
    /// whatever the placeholder bound to.
    Gen(u8),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuiltinSig {
    pub params: Vec<ParamTy>,
    pub ret: RetTy,
}

impl BuiltinSig {
    /// unify call-site argument types against this signature.
    fn unify(&self, args: &[Type]) -> Option<Type> {
        if args.len() != self.params.len() {
            return None;
        }
        let mut bound: [Option<&Type>; 4] = [None; 4];
        for (param, arg) in self.params.iter().zip(args) {
            match param {
                ParamTy::Exact(ty) => {
                    if ty != arg {
                        return None;
                    }
                }
                ParamTy::Gen(id) => {
                    if !arg.is_gen_float() {
                        return None;
                    }
                    match bound[*id as usize] {
                        None => bound[*id as usize] = Some(arg),
                        Some(prev) => {
                            if prev != arg {
                                return None;
                            }
                        }
                    }
                }
            }
        }
        match &self.ret {
            RetTy::Exact(ty) => Some(ty.clone()),
            RetTy::Gen(id) => bound[*id as usize].cloned(),
        }
    }
}

fn gen1(ret: RetTy) -> BuiltinSig {
    BuiltinSig {
        params: vec![ParamTy::Gen(0)],
        ret,
    }
}

fn gen2(ret: RetTy) -> BuiltinSig {
    BuiltinSig {
        params: vec![ParamTy::Gen(0), ParamTy::Gen(0)],
        ret,
    }
}

fn gen3(ret: RetTy) -> BuiltinSig {
    BuiltinSig {
        params: vec![ParamTy::Gen(0), ParamTy::Gen(0), ParamTy::Gen(0)],
        ret,
    }
}

fn sig(params: Vec<ParamTy>, ret: RetTy) -> BuiltinSig {
    BuiltinSig { params, ret }
}

lazy_static! {
    static ref BUILTIN_FNS: HashMap<&'static str, Vec<BuiltinSig>> = {
        use ParamTy::{Exact as P, Gen as G};
        use RetTy::{Exact as R, Gen as RG};
        use Type::*;

        let mut fns: HashMap<&'static str, Vec<BuiltinSig>> = HashMap::new();

        // componentwise unary
        for name in [
            "radians",
            "degrees",
            "sin",
            "cos",
            "tan",
            "asin",
            "acos",
            "atan",
            "exp",
            "log",
            "exp2",
            "log2",
            "sqrt",
            "inversesqrt",
            "abs",
            "sign",
            "floor",
            "ceil",
            "fract",
            "normalize",
        ] {
            fns.entry(name).or_default().push(gen1(RG(0)));
        }
        // two-argument arc tangent
        fns.entry("atan").or_default().push(gen2(RG(0)));

        // componentwise binary
        for name in ["pow", "mod", "min", "max"] {
            fns.entry(name).or_default().push(gen2(RG(0)));
        }
        // scalar second operand forms
        for name in ["mod", "min", "max"] {
            fns.entry(name)
                .or_default()
                .push(sig(vec![G(0), P(Float)], RG(0)));
        }

        fns.insert(
            "clamp",
            vec![gen3(RG(0)), sig(vec![G(0), P(Float), P(Float)], RG(0))],
        );
        fns.insert(
            "mix",
            vec![gen3(RG(0)), sig(vec![G(0), G(0), P(Float)], RG(0))],
        );
        fns.insert(
            "step",
            vec![gen2(RG(0)), sig(vec![P(Float), G(0)], RG(0))],
        );
        fns.insert(
            "smoothstep",
            vec![gen3(RG(0)), sig(vec![P(Float), P(Float), G(0)], RG(0))],
        );

        // geometric
        fns.insert("length", vec![gen1(R(Float))]);
        fns.insert("distance", vec![gen2(R(Float))]);
        fns.insert("dot", vec![gen2(R(Float))]);
        fns.insert(
            "cross",
            vec![sig(vec![P(Vec3), P(Vec3)], R(Vec3))],
        );
        fns.insert("reflect", vec![gen2(RG(0))]);
        fns.insert(
            "refract",
            vec![sig(vec![G(0), G(0), P(Float)], RG(0))],
        );
        fns.insert("faceforward", vec![gen3(RG(0))]);

        // texture sampling
        fns.insert(
            "texture2D",
            vec![
                sig(vec![P(Sampler2D), P(Vec2)], R(Vec4)),
                sig(vec![P(Sampler2D), P(Vec2), P(Float)], R(Vec4)),
            ],
        );
        fns.insert(
            "textureCube",
            vec![
                sig(vec![P(SamplerCube), P(Vec3)], R(Vec4)),
                sig(vec![P(SamplerCube), P(Vec3), P(Float)], R(Vec4)),
            ],
        );

        fns
    };

    static ref BUILTIN_VARS: HashMap<&'static str, Type> = HashMap::from([
        ("gl_Position", Type::Vec4),
        ("gl_PointSize", Type::Float),
        ("gl_FragColor", Type::Vec4),
        ("gl_FragCoord", Type::Vec4),
        ("gl_FrontFacing", Type::Bool),
    ]);
}

/// match a call against the intrinsic registry; `None` when no signature unifies.
pub fn resolve_builtin(name: &str, args: &[Type]) -> Option<Type> {
    let sigs = BUILTIN_FNS.get(name)?;
    sigs.iter().find_map(|sig| sig.unify(args))
}

pub fn builtin_var(name: &str) -> Option<&'static Type> {
    BUILTIN_VARS.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_unifies_with_first_argument() {
        assert_eq!(
            resolve_builtin("max", &[Type::Vec2, Type::Vec2]),
            Some(Type::Vec2)
        );
        // second occurrence must match the binding; scalar fallback applies instead.
        assert_eq!(
            resolve_builtin("max", &[Type::Vec2, Type::Float]),
            Some(Type::Vec2)
        );
        assert_eq!(resolve_builtin("max", &[Type::Vec2, Type::Vec3]), None);
    }

    #[test]
    fn exact_parameters() {
        assert_eq!(
            resolve_builtin("texture2D", &[Type::Sampler2D, Type::Vec2]),
            Some(Type::Vec4)
        );
        assert_eq!(
            resolve_builtin("texture2D", &[Type::Sampler2D, Type::Vec3]),
            None
        );
        assert_eq!(resolve_builtin("dot", &[Type::Vec3, Type::Vec3]), Some(Type::Float));
    }

    #[test]
    fn unknown_name_is_not_a_builtin() {
        assert_eq!(resolve_builtin("shade", &[Type::Float]), None);
    }
}

//! Compile shaderlab sources into per-pass GPU shader source plus the metadata
//! table consumed by the hosting render engine.
//!
//! ```rust
//! use shaderlab::{CompileOptions, Compiler, SourceRegistry};
//!
//! let source = r#"
//! Shader "Demo" {
//!     SubShader "Default" {
//!         Pass "Forward" {
//!             void vert() { gl_Position = vec4(0.0); }
//!             void frag() { gl_FragColor = vec4(1.0); }
//!             VertexShader = vert;
//!             FragmentShader = frag;
//!         }
//!     }
//! }
//! "#;
//! let registry = SourceRegistry::new();
//! let mut compiler = Compiler::new();
//! let compiled = compiler
//!     .compile(source, &registry, &CompileOptions::default())
//!     .unwrap();
//! assert_eq!(compiled.name, "Demo");
//! ```
//!
//! Compilation is synchronous and all-or-nothing: on any failure no partial
//! source is returned. A [`Compiler`] owns the pooled per-compilation state and
//! resets it before each run; share one per worker, never across threads.

pub mod codegen;
pub mod error;
pub mod preprocess;
pub mod shader;

pub use codegen::TargetDialect;
pub use error::{Error, GenerationError, PreprocessError, SemanticReport};
pub use preprocess::SourceRegistry;
pub use shader::{
    Property, PropertyType, PropertyValue, RenderState, RenderStateKind, RenderStateValue,
    TagValue, Tags,
};

use codegen::{DeclIndex, Stage};
use shader::{PassAst, ShaderAst};
use shaderlab_parse::{Context, Parser};

#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    pub dialect: TargetDialect,
}

/// The compiled program of one inline pass: stage sources plus the metadata the
/// engine needs to bind it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassProgram {
    pub name: String,
    pub tags: Tags,
    pub render_states: Vec<RenderState>,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub vertex_source: String,
    pub fragment_source: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompiledPass {
    Program(PassProgram),
    /// `UsePass "shader/subshader/pass"`: a reference the engine resolves
    /// against previously compiled passes.
    UsePass(String),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledSubShader {
    pub name: String,
    pub tags: Tags,
    pub render_states: Vec<RenderState>,
    pub passes: Vec<CompiledPass>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledShader {
    pub name: String,
    pub properties: Vec<Property>,
    pub render_states: Vec<RenderState>,
    pub sub_shaders: Vec<CompiledSubShader>,
}

/// Owns the pooled per-compilation state (node pool, scope stack, diagnostics).
/// Not safe for concurrent sharing: one compilation owns the pool between reset
/// and completion, so parallel compilation needs one `Compiler` per worker.
pub struct Compiler {
    ctx: Context,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            ctx: Context::new(),
        }
    }

    pub fn compile(
        &mut self,
        source: &str,
        registry: &SourceRegistry,
        options: &CompileOptions,
    ) -> Result<CompiledShader, Error> {
        let expanded = registry.expand(source)?;
        self.ctx.reset();
        let root = Parser::parse_str(&expanded, &mut self.ctx)
            .map_err(|e| Error::Parse(e.into_owned()))?;
        if !self.ctx.diagnostics.is_empty() {
            return Err(SemanticReport(std::mem::take(&mut self.ctx.diagnostics)).into());
        }
        let ast = shader::build(&self.ctx.pool, root);
        assemble(&self.ctx, &ast, options)
    }
}

/// one-shot convenience over a throwaway [`Compiler`].
pub fn compile(
    source: &str,
    registry: &SourceRegistry,
    options: &CompileOptions,
) -> Result<CompiledShader, Error> {
    Compiler::new().compile(source, registry, options)
}

fn assemble(
    ctx: &Context,
    ast: &ShaderAst,
    options: &CompileOptions,
) -> Result<CompiledShader, Error> {
    let mut sub_shaders = Vec::new();
    for sub in &ast.sub_shaders {
        let mut passes = Vec::new();
        for pass in &sub.passes {
            match pass {
                PassAst::Use(path) => passes.push(CompiledPass::UsePass(path.clone())),
                PassAst::Source(source_pass) => {
                    let vertex_entry = source_pass.vertex_entry.clone().ok_or_else(|| {
                        Error::MissingStageEntry {
                            pass: source_pass.name.clone(),
                            stage: "vertex",
                        }
                    })?;
                    let fragment_entry = source_pass.fragment_entry.clone().ok_or_else(|| {
                        Error::MissingStageEntry {
                            pass: source_pass.name.clone(),
                            stage: "fragment",
                        }
                    })?;
                    let decls = DeclIndex::new(
                        &ctx.pool,
                        &[&ast.globals, &sub.globals, &source_pass.items],
                    );
                    let vertex_source = codegen::generate(
                        &ctx.pool,
                        &decls,
                        &source_pass.name,
                        &vertex_entry,
                        Stage::Vertex,
                        options.dialect,
                    )?;
                    let fragment_source = codegen::generate(
                        &ctx.pool,
                        &decls,
                        &source_pass.name,
                        &fragment_entry,
                        Stage::Fragment,
                        options.dialect,
                    )?;
                    passes.push(CompiledPass::Program(PassProgram {
                        name: source_pass.name.clone(),
                        tags: source_pass.tags.clone(),
                        render_states: source_pass.render_states.clone(),
                        vertex_entry,
                        fragment_entry,
                        vertex_source,
                        fragment_source,
                    }));
                }
            }
        }
        sub_shaders.push(CompiledSubShader {
            name: sub.name.clone(),
            tags: sub.tags.clone(),
            render_states: sub.render_states.clone(),
            passes,
        });
    }
    Ok(CompiledShader {
        name: ast.name.clone(),
        properties: ast.properties.clone(),
        render_states: ast.render_states.clone(),
        sub_shaders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_source(source: &str) -> Result<CompiledShader, Error> {
        compile(source, &SourceRegistry::new(), &CompileOptions::default())
    }

    fn first_program(compiled: &CompiledShader) -> &PassProgram {
        compiled
            .sub_shaders
            .iter()
            .flat_map(|sub| &sub.passes)
            .find_map(|pass| match pass {
                CompiledPass::Program(program) => Some(program),
                CompiledPass::UsePass(_) => None,
            })
            .expect("no inline pass")
    }

    fn forward_pass(body: &str) -> String {
        format!(
            r#"Shader "T" {{ SubShader "S" {{ Pass "P" {{
                {body}
                void vert() {{ gl_Position = vec4(0.0); }}
                VertexShader = vert;
                FragmentShader = frag;
            }} }} }}"#
        )
    }

    #[test]
    fn square_function_survives_into_output() {
        let source = forward_pass(
            "float square(float x) { return x * x; }
             void frag() { gl_FragColor = vec4(square(2.0)); }",
        );
        let compiled = compile_source(&source).unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.contains("float square(float x)"), "{frag}");
        assert!(frag.contains("square(2.0)"), "{frag}");
        // the entry point is renamed for the GPU.
        assert!(frag.contains("void main()"), "{frag}");
        assert!(!frag.contains("void frag()"), "{frag}");
    }

    #[test]
    fn unreferenced_globals_are_pruned() {
        let source = forward_pass(
            "uniform float a;
             uniform float b;
             void frag() { gl_FragColor = vec4(a); }",
        );
        let compiled = compile_source(&source).unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.contains("uniform float a;"), "{frag}");
        assert!(!frag.contains("uniform float b;"), "{frag}");
        // a reachable declaration appears exactly once.
        assert_eq!(frag.matches("uniform float a;").count(), 1);
    }

    #[test]
    fn unreachable_functions_are_pruned() {
        let source = forward_pass(
            "float used(float x) { return x; }
             float unused(float x) { return x + 1.0; }
             void frag() { gl_FragColor = vec4(used(1.0)); }",
        );
        let compiled = compile_source(&source).unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.contains("float used"), "{frag}");
        assert!(!frag.contains("float unused"), "{frag}");
    }

    #[test]
    fn transitive_calls_are_kept() {
        let source = forward_pass(
            "float inner(float x) { return x * 0.5; }
             float outer(float x) { return inner(x) + 1.0; }
             void frag() { gl_FragColor = vec4(outer(2.0)); }",
        );
        let compiled = compile_source(&source).unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.contains("float inner"), "{frag}");
        assert!(frag.contains("float outer"), "{frag}");
        // callees precede callers, so the source order is emission order.
        assert!(frag.find("float inner").unwrap() < frag.find("float outer").unwrap());
    }

    #[test]
    fn include_behaves_as_if_written_inline() {
        let mut registry = SourceRegistry::new();
        registry.register("common", "const float PI = 3.14159;");
        let source = forward_pass(
            "#include <common>
             void frag() { gl_FragColor = vec4(PI); }",
        );
        let compiled = compile(&source, &registry, &CompileOptions::default()).unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.contains("const float PI = 3.14159;"), "{frag}");
    }

    #[test]
    fn compiling_twice_is_byte_identical() {
        let source = forward_pass(
            "uniform vec4 tint;
             float square(float x) { return x * x; }
             void frag() { gl_FragColor = tint * square(0.5); }",
        );
        let registry = SourceRegistry::new();
        let options = CompileOptions::default();
        let mut compiler = Compiler::new();
        let first = compiler.compile(&source, &registry, &options).unwrap();
        let second = compiler.compile(&source, &registry, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn failed_compilation_yields_no_output() {
        let source = forward_pass("void frag() { gl_FragColor = vec4(undefinedVar); }");
        let error = compile_source(&source).unwrap_err();
        assert!(matches!(error, Error::Semantic(_)));
        assert!(error.to_string().contains("undefinedVar"));
    }

    #[test]
    fn semantic_errors_are_batched() {
        let source = forward_pass(
            "void frag() {
                 gl_FragColor = vec4(firstMissing);
                 float x = secondMissing;
             }",
        );
        let error = compile_source(&source).unwrap_err();
        let Error::Semantic(report) = error else {
            panic!("expected a semantic report");
        };
        assert_eq!(report.0.len(), 2);
    }

    #[test]
    fn missing_stage_entry_is_reported() {
        let source = r#"Shader "T" { SubShader "S" { Pass "P" {
            void vert() { gl_Position = vec4(0.0); }
            VertexShader = vert;
        } } }"#;
        assert!(matches!(
            compile_source(source),
            Err(Error::MissingStageEntry { stage: "fragment", .. })
        ));
    }

    #[test]
    fn unknown_entry_point_is_reported() {
        let source = r#"Shader "T" { SubShader "S" { Pass "P" {
            void vert() { gl_Position = vec4(0.0); }
            VertexShader = vert;
            FragmentShader = nosuch;
        } } }"#;
        assert!(matches!(
            compile_source(source),
            Err(Error::EntryPointNotFound { name, .. }) if name == "nosuch"
        ));
    }

    #[test]
    fn metadata_tags_properties_and_render_states() {
        let source = r#"Shader "Lit" {
            EditorProperties {
                baseColor("Base Color", Color) = (1, 1, 1, 1);
                glossiness("Glossiness", Float) = 0.5;
                mainTex("Albedo", Texture2D);
            }
            SubShader "Default" {
                Tags { pipelineStage = "Forward", transparent = false }
                BlendState {
                    Enabled = true;
                    SourceColorBlendFactor = BlendFactor.SourceAlpha;
                }
                Pass "Base" {
                    Tags { LightMode = "Always" }
                    DepthState { WriteEnabled = true; }
                    void vert() { gl_Position = vec4(0.0); }
                    void frag() { gl_FragColor = vec4(1.0); }
                    VertexShader = vert;
                    FragmentShader = frag;
                }
                UsePass "Other/Default/Shadow"
            }
        }"#;
        let compiled = compile_source(source).unwrap();
        assert_eq!(compiled.name, "Lit");
        assert_eq!(compiled.properties.len(), 3);
        assert_eq!(compiled.properties[0].ty, PropertyType::Color);
        assert_eq!(
            compiled.properties[0].default,
            Some(PropertyValue::Tuple(vec![1.0, 1.0, 1.0, 1.0]))
        );
        assert_eq!(compiled.properties[1].default, Some(PropertyValue::Number(0.5)));
        assert_eq!(compiled.properties[2].ty, PropertyType::Texture2D);
        assert_eq!(compiled.properties[2].default, None);

        let sub = &compiled.sub_shaders[0];
        assert_eq!(
            sub.tags,
            vec![
                (
                    "pipelineStage".to_string(),
                    TagValue::Str("Forward".to_string())
                ),
                ("transparent".to_string(), TagValue::Bool(false)),
            ]
        );
        assert_eq!(sub.render_states[0].kind, RenderStateKind::Blend);
        assert_eq!(
            sub.render_states[0].properties[1],
            (
                "SourceColorBlendFactor".to_string(),
                RenderStateValue::Enum("BlendFactor.SourceAlpha".to_string())
            )
        );
        assert_eq!(sub.passes.len(), 2);
        assert!(matches!(
            &sub.passes[1],
            CompiledPass::UsePass(path) if path == "Other/Default/Shadow"
        ));
        let CompiledPass::Program(program) = &sub.passes[0] else {
            panic!("expected an inline pass");
        };
        assert_eq!(program.name, "Base");
        assert_eq!(program.vertex_entry, "vert");
        assert_eq!(program.render_states[0].kind, RenderStateKind::Depth);
    }

    #[test]
    fn gles300_dialect_polyfills() {
        let source = forward_pass(
            "uniform sampler2D mainTex;
             varying vec2 vUv;
             void frag() { gl_FragColor = texture2D(mainTex, vUv); }",
        );
        let compiled = compile(
            &source,
            &SourceRegistry::new(),
            &CompileOptions {
                dialect: TargetDialect::Gles300,
            },
        )
        .unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.starts_with("#version 300 es\n"), "{frag}");
        assert!(frag.contains("#define texture2D texture"), "{frag}");
        assert!(frag.contains("in vec2 vUv;"), "{frag}");
        assert!(frag.contains("#define gl_FragColor glFragColor"), "{frag}");
    }

    #[test]
    fn struct_varyings_are_flattened_member_by_member() {
        let source = forward_pass(
            "struct V2F {
                 vec2 uv;
                 vec3 normal;
             };
             varying V2F v2f;
             void frag() { gl_FragColor = vec4(v2f.uv, 0.0, 1.0); }",
        );
        let compiled = compile_source(&source).unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.contains("varying vec2 v2f_uv;"), "{frag}");
        assert!(frag.contains("v2f_uv"), "{frag}");
        // the untouched member and the aggregate form are absent.
        assert!(!frag.contains("v2f_normal"), "{frag}");
        assert!(!frag.contains("v2f.uv"), "{frag}");
    }

    #[test]
    fn macro_directives_are_reemitted_and_keep_referents_alive() {
        let source = forward_pass(
            "uniform float fogDensity;
             #define FOG_SCALE fogDensity * 2.0
             void frag() { gl_FragColor = vec4(1.0); }",
        );
        let compiled = compile_source(&source).unwrap();
        let frag = &first_program(&compiled).fragment_source;
        assert!(frag.contains("#define FOG_SCALE fogDensity * 2.0"), "{frag}");
        assert!(frag.contains("uniform float fogDensity;"), "{frag}");
    }

    #[test]
    fn vertex_and_fragment_prune_independently() {
        let source = forward_pass(
            "attribute vec3 position;
             uniform float fragOnly;
             void frag() { gl_FragColor = vec4(fragOnly); }",
        )
        .replace(
            "void vert() { gl_Position = vec4(0.0); }",
            "void vert() { gl_Position = vec4(position, 1.0); }",
        );
        let compiled = compile_source(&source).unwrap();
        let program = first_program(&compiled);
        assert!(program.vertex_source.contains("attribute vec3 position;"));
        assert!(!program.vertex_source.contains("fragOnly"));
        assert!(program.fragment_source.contains("uniform float fragOnly;"));
        assert!(!program.fragment_source.contains("position"));
    }
}

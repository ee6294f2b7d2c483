#![cfg_attr(not(test), allow(dead_code, unused_imports))]

use shaderlab::{
    compile, CompileOptions, CompiledPass, CompiledShader, Compiler, Error, PassProgram,
    PropertyValue, RenderStateKind, SourceRegistry, TagValue, TargetDialect,
};

/// a lit shader exercising most of the surface: properties, tags, render
/// states, includes, struct varyings, overloads, builtins and macros.
const LIT: &str = r#"
Shader "Water" {
    EditorProperties {
        baseColor("Base Color", Color) = (0.2, 0.4, 0.8, 1.0);
        waveStrength("Wave Strength", Float) = 0.25;
        normalTex("Normal Map", Texture2D);
    }

    uniform vec4 baseColor;

    SubShader "Default" {
        Tags { pipelineStage = "Forward" }

        Pass "Water" {
            Tags { LightMode = "Always", queue = 2000 }

            BlendState waterBlend {
                Enabled = true;
                SourceColorBlendFactor = BlendFactor.SourceAlpha;
                DestinationColorBlendFactor = BlendFactor.OneMinusSourceAlpha;
            }
            DepthState { WriteEnabled = false; }

            #include <noise>

            struct Attributes {
                vec3 position;
                vec2 uv;
            };

            attribute Attributes attr;
            varying vec2 vUv;

            uniform mat4 viewProjection;
            uniform float waveStrength;
            uniform float unusedUniform;
            uniform sampler2D normalTex;

            #define WAVE_SPEED 1.5

            float wave(float x) { return sin(x) * waveStrength; }
            vec2 wave(vec2 x) { return vec2(wave(x.x), wave(x.y)); }

            void vert() {
                vec3 pos = attr.position;
                pos.y += wave(noise(attr.uv));
                vUv = attr.uv;
                gl_Position = viewProjection * vec4(pos, 1.0);
            }

            void frag() {
                vec2 bump = wave(vUv) * 0.5;
                vec4 normal = texture2D(normalTex, vUv + bump);
                #ifdef WAVE_SPEED
                normal = normalize(normal);
                #endif
                gl_FragColor = baseColor * normal;
            }

            VertexShader = vert;
            FragmentShader = frag;
        }

        UsePass "Shared/Default/Shadow"
    }
}
"#;

fn noise_registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register("noise", "float noise(vec2 p) { return fract(p.x * 12.9898 + p.y * 78.233); }");
    registry
}

fn compile_lit(dialect: TargetDialect) -> CompiledShader {
    compile(LIT, &noise_registry(), &CompileOptions { dialect })
        .map_err(|e| e.to_string())
        .expect("compile error")
}

fn inline_pass(compiled: &CompiledShader) -> &PassProgram {
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

#[test]
fn lit_shader_compiles_end_to_end() {
    let compiled = compile_lit(TargetDialect::Gles100);
    assert_eq!(compiled.name, "Water");

    // metadata
    assert_eq!(compiled.properties.len(), 3);
    assert_eq!(
        compiled.properties[1].default,
        Some(PropertyValue::Number(0.25))
    );
    let sub = &compiled.sub_shaders[0];
    assert_eq!(
        sub.tags[0],
        ("pipelineStage".to_string(), TagValue::Str("Forward".to_string()))
    );
    assert_eq!(sub.passes.len(), 2);
    assert!(matches!(
        &sub.passes[1],
        CompiledPass::UsePass(path) if path == "Shared/Default/Shadow"
    ));

    let pass = inline_pass(&compiled);
    assert_eq!(pass.tags[1], ("queue".to_string(), TagValue::Number(2000.0)));
    assert_eq!(pass.render_states[0].kind, RenderStateKind::Blend);
    assert_eq!(pass.render_states[0].name.as_deref(), Some("waterBlend"));
    assert_eq!(pass.render_states[1].kind, RenderStateKind::Depth);
    assert_eq!(pass.vertex_entry, "vert");
    assert_eq!(pass.fragment_entry, "frag");
}

#[test]
fn vertex_stage_flattens_struct_attributes_and_prunes() {
    let compiled = compile_lit(TargetDialect::Gles100);
    let vertex = &inline_pass(&compiled).vertex_source;

    // struct attributes are expanded member by member.
    assert!(vertex.contains("attribute vec3 attr_position;"), "{vertex}");
    assert!(vertex.contains("attribute vec2 attr_uv;"), "{vertex}");
    assert!(vertex.contains("attr_position"), "{vertex}");
    assert!(!vertex.contains("attr.position"), "{vertex}");

    // the included fragment behaves as if written inline.
    assert!(vertex.contains("float noise(vec2 p)"), "{vertex}");

    // reachable code survives, unreachable declarations do not.
    assert!(vertex.contains("uniform mat4 viewProjection;"), "{vertex}");
    assert!(!vertex.contains("unusedUniform"), "{vertex}");
    assert!(!vertex.contains("normalTex"), "{vertex}");
    assert!(vertex.contains("void main()"), "{vertex}");
}

#[test]
fn fragment_stage_keeps_its_own_references() {
    let compiled = compile_lit(TargetDialect::Gles100);
    let fragment = &inline_pass(&compiled).fragment_source;

    assert!(fragment.contains("uniform sampler2D normalTex;"), "{fragment}");
    assert!(fragment.contains("varying vec2 vUv;"), "{fragment}");
    assert!(fragment.contains("uniform vec4 baseColor;"), "{fragment}");
    // both overloads of `wave` are reachable from the fragment entry.
    assert!(fragment.contains("float wave(float x)"), "{fragment}");
    assert!(fragment.contains("vec2 wave(vec2 x)"), "{fragment}");
    // macros re-emit verbatim.
    assert!(fragment.contains("#define WAVE_SPEED 1.5"), "{fragment}");
    assert!(fragment.contains("#ifdef WAVE_SPEED"), "{fragment}");
    assert!(fragment.contains("#endif"), "{fragment}");
    // vertex-only declarations are pruned from the fragment stage.
    assert!(!fragment.contains("viewProjection"), "{fragment}");
    assert!(!fragment.contains("attr_position"), "{fragment}");
}

#[test]
fn gles300_output_swaps_qualifiers_and_polyfills() {
    let compiled = compile_lit(TargetDialect::Gles300);
    let pass = inline_pass(&compiled);

    assert!(pass.vertex_source.starts_with("#version 300 es\n"));
    assert!(pass.vertex_source.contains("in vec3 attr_position;"));
    assert!(pass.vertex_source.contains("out vec2 vUv;"));

    assert!(pass.fragment_source.contains("in vec2 vUv;"));
    assert!(pass.fragment_source.contains("#define texture2D texture"));
    assert!(pass
        .fragment_source
        .contains("#define gl_FragColor glFragColor"));
}

#[test]
fn one_compiler_is_deterministic_across_runs() {
    let registry = noise_registry();
    let options = CompileOptions::default();
    let mut compiler = Compiler::new();
    let first = compiler.compile(LIT, &registry, &options).unwrap();
    let second = compiler.compile(LIT, &registry, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_include_fails_the_whole_compilation() {
    let error = compile(LIT, &SourceRegistry::new(), &CompileOptions::default()).unwrap_err();
    assert!(matches!(error, Error::Preprocess(_)));
}

#[test]
fn syntax_error_fails_fast() {
    let source = r#"Shader "Broken" { SubShader "S" { Pass }"#;
    let error = compile(source, &SourceRegistry::new(), &CompileOptions::default()).unwrap_err();
    assert!(matches!(error, Error::Parse(_)));
}

#[test]
fn lexical_error_fails_fast() {
    let source = "Shader \"Broken\" { @ }";
    let error = compile(source, &SourceRegistry::new(), &CompileOptions::default()).unwrap_err();
    assert!(matches!(error, Error::Parse(_)));
}

#[test]
fn context_reset_clears_state_between_compilations() {
    use shaderlab_parse::{Context, Parser};
    let mut ctx = Context::new();
    let bad = r#"Shader "A" { SubShader "S" { Pass "P" {
        void f() { float x = missing; }
    } } }"#;
    Parser::parse_str(bad, &mut ctx)
        .map_err(|e| e.to_string())
        .unwrap();
    assert!(!ctx.diagnostics.is_empty());

    ctx.reset();
    let good = r#"Shader "A" { SubShader "S" { Pass "P" {
        void f() { float x = 1.0; }
    } } }"#;
    Parser::parse_str(good, &mut ctx)
        .map_err(|e| e.to_string())
        .unwrap();
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn semantic_failure_reports_every_error() {
    let source = r#"Shader "T" { SubShader "S" { Pass "P" {
        void vert() { gl_Position = missingA; }
        void frag() { gl_FragColor = missingB; }
        VertexShader = vert;
        FragmentShader = frag;
    } } }"#;
    let error = compile(source, &SourceRegistry::new(), &CompileOptions::default()).unwrap_err();
    let Error::Semantic(report) = error else {
        panic!("expected semantic errors, got {error}");
    };
    assert_eq!(report.0.len(), 2);
    let rendered = report.to_string();
    assert!(rendered.contains("missingA") && rendered.contains("missingB"));
}

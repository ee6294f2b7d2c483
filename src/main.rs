//! The command-line interface for the shaderlab compiler suite.

use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand, ValueEnum};
use shaderlab::{compile, CompileOptions, CompiledPass, SourceRegistry, TargetDialect};
use shaderlab_parse::ast::NodeId;
use shaderlab_parse::{Context, Parser as ShaderParser};

#[derive(Parser)]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// main command
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// check correctness of the source file
    Check(CommonArgs),
    /// output the syntax tree to stdout
    Dump(CommonArgs),
    /// compile a source file and print the per-pass sources and metadata
    Compile(CompileArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// shader file entry-point
    input: PathBuf,
    /// register an include fragment, as name=path (repeatable)
    #[arg(long = "include", value_name = "NAME=PATH")]
    includes: Vec<String>,
}

#[derive(Args)]
struct CompileArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// output dialect
    #[arg(long, value_enum, default_value_t = DialectArg::Gles100)]
    dialect: DialectArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Gles100,
    Gles300,
}

impl From<DialectArg> for TargetDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Gles100 => TargetDialect::Gles100,
            DialectArg::Gles300 => TargetDialect::Gles300,
        }
    }
}

fn build_registry(args: &CommonArgs) -> Result<SourceRegistry, String> {
    let mut registry = SourceRegistry::new();
    for entry in &args.includes {
        let (name, path) = entry
            .split_once('=')
            .ok_or_else(|| format!("invalid include `{entry}`, expected NAME=PATH"))?;
        let source = fs::read_to_string(path)
            .map_err(|e| format!("could not read include `{path}`: {e}"))?;
        registry.register(name, source);
    }
    Ok(registry)
}

fn dump_node(ctx: &Context, id: NodeId, depth: usize) {
    let node = ctx.pool.get(id);
    println!(
        "{}{:?} @ {:?}",
        "  ".repeat(depth),
        node.kind,
        node.span.range()
    );
    for child in ctx.pool.child_nodes(id) {
        dump_node(ctx, child, depth + 1);
    }
}

fn check_or_dump(args: &CommonArgs, dump: bool) -> ExitCode {
    let source = fs::read_to_string(&args.input).expect("could not open input file");
    let registry = match build_registry(args) {
        Ok(registry) => registry,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let expanded = match registry.expand(&source) {
        Ok(expanded) => expanded,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let mut ctx = Context::new();
    let root = match ShaderParser::parse_str(&expanded, &mut ctx) {
        Ok(root) => root,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if !ctx.diagnostics.is_empty() {
        let report = shaderlab::SemanticReport(ctx.diagnostics.clone());
        eprintln!("{}", report.render(&expanded));
        return ExitCode::FAILURE;
    }
    if dump {
        dump_node(&ctx, root, 0);
    } else {
        println!("{} -- OK", args.input.display());
    }
    ExitCode::SUCCESS
}

fn run_compile(args: &CompileArgs) -> ExitCode {
    let source = fs::read_to_string(&args.common.input).expect("could not open input file");
    let registry = match build_registry(&args.common) {
        Ok(registry) => registry,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let options = CompileOptions {
        dialect: args.dialect.into(),
    };
    let compiled = match compile(&source, &registry, &options) {
        Ok(compiled) => compiled,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!("Shader \"{}\"", compiled.name);
    for property in &compiled.properties {
        println!("  property {property:?}");
    }
    for sub in &compiled.sub_shaders {
        println!("SubShader \"{}\" tags={:?}", sub.name, sub.tags);
        for pass in &sub.passes {
            match pass {
                CompiledPass::UsePass(path) => println!("  UsePass \"{path}\""),
                CompiledPass::Program(program) => {
                    println!(
                        "  Pass \"{}\" tags={:?} states={:?}",
                        program.name, program.tags, program.render_states
                    );
                    println!("  -- vertex ({}) --", program.vertex_entry);
                    println!("{}", program.vertex_source);
                    println!("  -- fragment ({}) --", program.fragment_entry);
                    println!("{}", program.fragment_source);
                }
            }
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match &cli.command {
        Command::Check(args) => check_or_dump(args, false),
        Command::Dump(args) => check_or_dump(args, true),
        Command::Compile(args) => run_compile(args),
    }
}

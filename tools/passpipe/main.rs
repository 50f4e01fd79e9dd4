//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use ansi_term::Color::{Red, Yellow};
use passpipe::cli::{self, BaseOptions, EmitFormat};
use passpipe::pipeline::{self, standard, PipelineDefinition};
use passpipe::registry::{PassRegistry, RegistryError, TextSource};
use passpipe::validate::{Diagnostic, Severity, ValidationOptions, Validator};
use passpipe::{catalog, text};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};

struct Options {
    list: bool,
    default: bool,
    stock: Option<String>,
    catalog: Option<PathBuf>,
    emit: EmitFormat,
    flatten: bool,
    validator: Validator,
}

fn main() -> ExitCode {
    let (options, base) = parse_options();

    cli::init_logging(base.verbose);

    let registry = match load_registry(options.catalog.as_deref()) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("{}: unable to load pass catalog: {err}", Red.bold().paint("error"));

            return ExitCode::from(1);
        }
    };

    let mut out = String::default();
    let failed = !run(&options, &base, &registry, &mut out);

    if let Err(err) = write_output(base.output.as_deref(), &out) {
        eprintln!("{}: unable to write output: {err}", Red.bold().paint("error"));

        return ExitCode::from(1);
    }

    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn parse_options() -> (Options, BaseOptions) {
    let list = cli::list();
    let default = cli::default_pipeline();
    let stock = cli::stock();
    let catalog = cli::catalog();
    let emit = cli::emit_format();
    let flatten = cli::flatten();
    let duplicates = cli::duplicate_policy();

    let ((list, default, stock, catalog, emit, flatten, duplicates), base) = cli::tool_with(
        "pass pipeline builder, validator and printer",
        "Usage: passpipe [--list] [--default] [--stock NAME] [options] [FILES]",
        bpaf::construct!(list, default, stock, catalog, emit, flatten, duplicates),
    )
    .run();

    let options = Options {
        list,
        default,
        stock,
        catalog,
        emit,
        flatten,
        validator: Validator::new(ValidationOptions { duplicates }),
    };

    (options, base)
}

fn load_registry(catalog: Option<&Path>) -> Result<PassRegistry, String> {
    let path = match catalog {
        Some(path) => path,
        None => return catalog::load_registry().map_err(|err| err.to_string()),
    };

    let contents = fs::read_to_string(path)
        .map_err(|err| format!("unable to read `{}`: {err}", path.display()))?;

    let mut registry = PassRegistry::new();

    registry
        .load(&TextSource::new(&contents))
        .map_err(|err: RegistryError| format!("{}: {err}", path.display()))?;
    registry.freeze();

    Ok(registry)
}

// returns whether everything that was requested succeeded
fn run(options: &Options, base: &BaseOptions, registry: &PassRegistry, out: &mut String) -> bool {
    let mut ok = true;

    if options.list {
        for pass in registry.all() {
            *out += &format!("{} {}\n", pass.name(), pass.kind());
        }
    }

    if options.default {
        let def = pipeline::default_pipeline(registry);

        ok &= emit_checked("<default>", &def, options, registry, out);
    }

    if let Some(name) = &options.stock {
        match standard::by_name(name) {
            Some(def) => ok &= emit_checked(name, &def, options, registry, out),
            None => {
                let known = standard::STOCK_PIPELINES.join(", ");

                eprintln!(
                    "{}: unknown stock pipeline `{name}`, expected one of: {known}",
                    Red.bold().paint("error")
                );

                ok = false;
            }
        }
    }

    for input in base.inputs.iter() {
        ok &= emit_file(input, options, registry, out);
    }

    ok
}

fn emit_file(path: &Path, options: &Options, registry: &PassRegistry, out: &mut String) -> bool {
    let file = path.display().to_string();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: unable to read `{file}`: {err}", Red.bold().paint("error"));

            return false;
        }
    };

    match passpipe::check_pipeline(&file, &source, registry, &options.validator) {
        Ok((def, validated)) => {
            print_diagnostics(&file, validated.warnings());

            emit(&def, options, out)
        }
        Err(message) => {
            eprintln!("{}: `{file}` is not a valid pipeline", Red.bold().paint("error"));
            eprintln!("{message}");

            false
        }
    }
}

fn emit_checked(
    name: &str,
    def: &PipelineDefinition,
    options: &Options,
    registry: &PassRegistry,
    out: &mut String,
) -> bool {
    match options.validator.check(def, registry) {
        Ok(validated) => {
            print_diagnostics(name, validated.warnings());

            emit(def, options, out)
        }
        Err(diagnostics) => {
            print_diagnostics(name, &diagnostics);

            false
        }
    }
}

fn emit(def: &PipelineDefinition, options: &Options, out: &mut String) -> bool {
    match (options.emit, options.flatten) {
        (EmitFormat::Text, false) => *out += &text::dump(def),
        (EmitFormat::Text, true) => *out += &text::dump_flat(def),
        (EmitFormat::Json, flatten) => {
            let json = if flatten {
                serde_json::to_string_pretty(&def.flatten())
            } else {
                text::to_json(def)
            };

            match json {
                Ok(json) => {
                    *out += &json;
                    out.push('\n');
                }
                Err(err) => {
                    eprintln!("{}: unable to emit JSON: {err}", Red.bold().paint("error"));

                    return false;
                }
            }
        }
    }

    true
}

fn print_diagnostics(name: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => Red.bold().paint("error"),
            Severity::Warning => Yellow.bold().paint("warning"),
        };

        eprintln!("{severity}: {name}: {}", diagnostic.violation);
    }
}

fn write_output(output: Option<&Path>, out: &str) -> io::Result<()> {
    match output {
        Some(path) => fs::write(path, out),
        None => {
            print!("{out}");

            Ok(())
        }
    }
}

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Contains utility code specifically for the CLI tools located in
//! the `tools/` subdirectory.
//!
//! All of these tools have similar command-line arguments and they all
//! should look/feel uniform, so most of the code is pulled into this
//! module and then used in the drivers of the different tools.

use crate::validate::DuplicatePolicy;
use bpaf::{construct, OptionParser, Parser};
use std::path::PathBuf;
use tracing::Level;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The format for a tool emitting pipelines to emit in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EmitFormat {
    /// The human-readable textual format, see [`crate::text`].
    Text,
    /// JSON, mostly useful for feeding pipelines to other tools.
    Json,
}

/// Basic options that every CLI tool in the suite takes in.
pub struct BaseOptions {
    /// The file to output results to
    pub output: Option<PathBuf>,
    /// Whether or not to run the logging in verbose mode.
    pub verbose: bool,
    /// The list of inputs given to the tool
    pub inputs: Vec<PathBuf>,
}

/// Returns a [`OptionParser`] preconfigured with the standard
/// options and additional tool-specific options.
pub fn tool_with<T>(
    description: &'static str,
    usage: &'static str,
    additional: impl Parser<T> + 'static,
) -> OptionParser<(T, BaseOptions)> {
    let res = construct!(additional, default());

    res.to_options()
        .descr(description)
        .version(VERSION)
        .usage(usage)
}

/// Gets the baseline default options that every tool needs.
pub fn default() -> impl Parser<BaseOptions> {
    let inputs = inputs();
    let output = output();
    let verbose = verbose();

    construct!(BaseOptions {
        output,
        verbose,
        inputs,
    })
}

/// Gets the output file specified on the CLI, if one exists.
pub fn output() -> impl Parser<Option<PathBuf>> {
    bpaf::long("output")
        .short('o')
        .help("the file to output to")
        .argument::<PathBuf>("FILE")
        .optional()
}

/// Gets the input file specified on the CLI.
pub fn inputs() -> impl Parser<Vec<PathBuf>> {
    bpaf::positional::<PathBuf>("FILES")
        .help("files to read as input to the tool")
        .many()
}

/// Checks for the presence of `-v` or `--verbose`
pub fn verbose() -> impl Parser<bool> {
    bpaf::long("verbose")
        .short('v')
        .help("enable verbose output")
        .flag(true, false)
}

/// Gets the number of concurrent threads to use for a given task
pub fn jobs() -> impl Parser<Option<usize>> {
    bpaf::long("jobs")
        .short('j')
        .help("the number of concurrent jobs to run tests on")
        .argument::<usize>("JOBS")
        .optional()
}

/// Gets the emit format for a tool that emits pipelines
pub fn emit_format() -> impl Parser<EmitFormat> {
    bpaf::long("emit")
        .short('e')
        .help("the format to emit pipelines in, either 'text' or 'json'")
        .argument::<String>("FORMAT")
        .guard(
            |fmt| fmt == "text" || fmt == "json",
            "format must be one of 'text', 'json'",
        )
        .map(|fmt| match fmt.as_str() {
            "json" => EmitFormat::Json,
            _ => EmitFormat::Text,
        })
        .optional()
        .map(|opt| opt.unwrap_or(EmitFormat::Text))
}

/// How repeated transform passes should be treated while validating
pub fn duplicate_policy() -> impl Parser<DuplicatePolicy> {
    bpaf::long("duplicates")
        .help("how to treat transforms that run twice, one of 'allow', 'warn' or 'deny'")
        .argument::<String>("POLICY")
        .guard(
            |policy| matches!(policy.as_str(), "allow" | "warn" | "deny"),
            "policy must be one of 'allow', 'warn', 'deny'",
        )
        .map(|policy| match policy.as_str() {
            "allow" => DuplicatePolicy::Allow,
            "deny" => DuplicatePolicy::Deny,
            _ => DuplicatePolicy::Warn,
        })
        .optional()
        .map(Option::unwrap_or_default)
}

/// Gets a pass catalog file to load the registry from, if one was given.
pub fn catalog() -> impl Parser<Option<PathBuf>> {
    bpaf::long("catalog")
        .help("a `<name> <kind>` listing of passes to use instead of the built-in catalog")
        .argument::<PathBuf>("FILE")
        .optional()
}

/// Gets the name of a stock pipeline to emit, if one was given.
pub fn stock() -> impl Parser<Option<String>> {
    bpaf::long("stock")
        .help("emit one of the stock pipelines, e.g. 'normal' or 'diagnostic'")
        .argument::<String>("NAME")
        .optional()
}

/// Checks for the presence of `--list`
pub fn list() -> impl Parser<bool> {
    bpaf::long("list")
        .help("print every registered pass along with its kind")
        .flag(true, false)
}

/// Checks for the presence of `--default`
pub fn default_pipeline() -> impl Parser<bool> {
    bpaf::long("default")
        .help("emit the default pipeline, every registered pass in order")
        .flag(true, false)
}

/// Checks for the presence of `--flatten`
pub fn flatten() -> impl Parser<bool> {
    bpaf::long("flatten")
        .help("emit the flat list of passes instead of the pipeline structure")
        .flag(true, false)
}

/// Installs the logger used by every tool, writing to `stderr`.
///
/// Only warnings and errors are shown unless `verbose` is set, in which case
/// the level is raised to `DEBUG`. `RUST_LOG` overrides both.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // a subscriber may already be installed if a tool is embedded in a test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

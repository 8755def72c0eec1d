// FILE: src/cli/handlers.rs
use crate::{
    cli::OutputFormat,
    classifier::to_segment,
    compile_source_into, compile_source_local, load_source,
    rule_generator::compile_rule,
    Artifact, CompilationStats, CompileOutput, CompiledStyles, CompilerError, CompilerOptions,
    ContextPath, Direction, Normalizer, Result, StyleCompiler, StyleRegistry, Value, Warning,
};

use clap::ArgMatches;
use rayon::prelude::*;
use indexmap::IndexMap;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Instant;

/// Everything produced by one `compile` run
struct Compilation {
    registry: StyleRegistry,
    files: Vec<(PathBuf, CompileOutput)>,
    stats: CompilationStats,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    styles: IndexMap<String, &'a CompiledStyles>,
    artifacts: Vec<&'a Artifact>,
    warnings: Vec<&'a Warning>,
    fingerprint: String,
}

// --- COMPILE ---
pub fn handle_compile_command(cli: &super::EnhancedCli, matches: &ArgMatches) -> Result<()> {
    let inputs: Vec<String> = matches
        .get_many::<String>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let output_path = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .or_else(|| cli.configured_output())
        .map(str::to_string);
    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or(OutputFormat::Css);

    let options = cli.build_compiler_options(matches)?;
    if let Some(&jobs) = matches.get_one::<usize>("jobs") {
        configure_thread_pool(jobs);
    }
    let request = CompileRequest {
        inputs: &inputs,
        output_path: output_path.as_deref(),
        format,
        show_stats: matches.get_flag("stats"),
    };

    if matches.get_flag("watch") {
        watch_and_compile(&request, options)
    } else {
        request.run(&options)?;
        log::debug!("compile command finished in {}ms", cli.elapsed_ms());
        Ok(())
    }
}

fn configure_thread_pool(jobs: usize) {
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
    {
        log::warn!("Could not configure {} compiler threads: {}", jobs, e);
    }
}

struct CompileRequest<'a> {
    inputs: &'a [String],
    output_path: Option<&'a str>,
    format: OutputFormat,
    show_stats: bool,
}

impl CompileRequest<'_> {
    fn run(&self, options: &CompilerOptions) -> Result<CompilationStats> {
        let paths = collect_inputs(self.inputs, true)?;
        self.status(&format!(
            "🔨 Compiling {} file(s) -> {}",
            paths.len(),
            self.output_path.unwrap_or("stdout")
        ));

        let compilation = compile_inputs(&paths, options)?;
        let text = render(self.format, &compilation)?;
        let mut stats = compilation.stats;
        stats.output_size = text.len() as u64;

        match self.output_path {
            Some(path) => fs::write(path, &text)?,
            None => print!("{}", text),
        }

        for (path, output) in &compilation.files {
            for warning in &output.warnings {
                self.status(&format!("⚠️  {}: {}", path.display(), warning));
            }
        }
        self.status("✅ Compilation successful!");
        self.status(&format!(
            "   Rules: {}, keyframes: {}",
            stats.rule_count, stats.keyframes_count
        ));
        self.status(&format!("   Output: {} bytes", stats.output_size));
        self.status(&format!("   Time: {}ms", stats.compile_time_ms));

        if self.show_stats {
            self.status(&detailed_stats(&stats));
        }
        Ok(stats)
    }

    // Stylesheets on stdout keep status lines on stderr
    fn status(&self, line: &str) {
        if self.output_path.is_some() {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
}

/// Expand directories into the JSON sources they contain, sorted by path
fn collect_inputs(inputs: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if !path.is_dir() {
            paths.push(path.to_path_buf());
            continue;
        }

        let walker = walkdir::WalkDir::new(path).sort_by_file_name();
        let walker = if recursive { walker } else { walker.max_depth(1) };
        for entry in walker {
            let entry = entry.map_err(|e| {
                CompilerError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Directory traversal error: {}", e),
                ))
            })?;
            if entry.file_type().is_file() && is_source(entry.path()) {
                paths.push(entry.path().to_path_buf());
            }
        }
    }

    if paths.is_empty() {
        return Err(CompilerError::FileNotFound {
            path: format!("no JSON style sources in {}", inputs.join(", ")),
        });
    }
    Ok(paths)
}

fn is_source(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

/// Compile every source on the rayon pool, then merge them into one
/// registry in input order
fn compile_inputs(paths: &[PathBuf], options: &CompilerOptions) -> Result<Compilation> {
    let start = Instant::now();
    let compiler = StyleCompiler::new(options.clone())?;
    let mut stats = CompilationStats::default();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        stats.source_size += fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
        sources.push(load_source(path)?);
    }

    let results: Vec<Result<CompileOutput>> = sources
        .par_iter()
        .map(|source| compile_source_local(&compiler, source))
        .collect();

    let mut registry = StyleRegistry::new();
    let mut files = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();
    for ((path, source), result) in paths.iter().zip(&sources).zip(results) {
        let merged = result.and_then(|output| {
            registry.merge(&output.artifacts)?;
            Ok(output)
        });
        match merged {
            Ok(output) => {
                stats.record(&output, source.keyframes.len());
                files.push((path.clone(), output));
            }
            Err(e) => {
                eprintln!("❌ {}: {}", path.display(), e);
                failures.push(e);
            }
        }
    }
    if let Some(first) = failures.into_iter().next() {
        return Err(first);
    }

    stats.finish(&registry, 0);
    stats.compile_time_ms = start.elapsed().as_millis() as u64;

    Ok(Compilation {
        registry,
        files,
        stats,
    })
}

fn render(format: OutputFormat, compilation: &Compilation) -> Result<String> {
    match format {
        OutputFormat::Css => Ok(compilation.registry.to_css(Direction::Ltr)),
        OutputFormat::Rtl => Ok(compilation.registry.to_css(Direction::Rtl)),
        OutputFormat::Json => {
            let document = JsonOutput {
                styles: compilation
                    .files
                    .iter()
                    .map(|(path, output)| (path.display().to_string(), &output.styles))
                    .collect(),
                artifacts: compilation.registry.sorted(),
                warnings: compilation
                    .files
                    .iter()
                    .flat_map(|(_, output)| &output.warnings)
                    .collect(),
                fingerprint: compilation.registry.fingerprint(),
            };
            let mut text =
                serde_json::to_string_pretty(&document).map_err(|e| CompilerError::InvalidFormat {
                    message: format!("Failed to serialize output: {}", e),
                })?;
            text.push('\n');
            Ok(text)
        }
    }
}

fn watch_and_compile(request: &CompileRequest<'_>, options: CompilerOptions) -> Result<()> {
    println!("👀 Watching {} for changes...", request.inputs.join(", "));

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        CompilerError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    for input in request.inputs {
        let path = Path::new(input);
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(path, mode).map_err(|e| {
            CompilerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to watch {}: {}", input, e),
            ))
        })?;
    }

    if let Err(e) = request.run(&options) {
        eprintln!("❌ Initial compilation failed: {}", e);
    }

    let output = request.output_path.map(Path::new);
    loop {
        match rx.recv() {
            Ok(event) => {
                if !triggers_rebuild(&event, output) {
                    continue;
                }
                println!("🔄 Sources changed, recompiling...");
                if let Err(e) = request.run(&options) {
                    eprintln!("❌ Compilation failed: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Ignore reads and writes of our own output file
fn triggers_rebuild(event: &Event, output: Option<&Path>) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|path| output.map_or(true, |output| !path.ends_with(output)) && is_source(path))
}

fn detailed_stats(stats: &CompilationStats) -> String {
    format!(
        "\n📊 Detailed Compilation Statistics:\n   \
         Source size: {} bytes\n   \
         Output size: {} bytes\n   \
         Compile time: {}ms\n\n   \
         Breakdown:\n     \
         Files: {}\n     \
         Namespaces: {}\n     \
         Rules: {}\n     \
         Keyframes: {}\n     \
         Warnings: {}",
        stats.source_size,
        stats.output_size,
        stats.compile_time_ms,
        stats.file_count,
        stats.namespace_count,
        stats.rule_count,
        stats.keyframes_count,
        stats.warning_count,
    )
}

// --- CHECK ---
pub fn handle_check_command(cli: &super::EnhancedCli, matches: &ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let options = cli.build_compiler_options(matches)?;
    let compiler = StyleCompiler::new(options)?;

    if Path::new(input_path).is_dir() {
        check_directory(&compiler, input_path, matches.get_flag("recursive"))
    } else {
        check_single_file(&compiler, Path::new(input_path)).map(|_| ())
    }
}

/// Compile into a scratch registry, returning the warnings
fn check_single_file(compiler: &StyleCompiler, input_path: &Path) -> Result<Vec<Warning>> {
    println!("🔍 Checking {}", input_path.display());
    let result = load_source(input_path).and_then(|source| {
        let mut registry = StyleRegistry::new();
        compile_source_into(compiler, &source, &mut registry).map(|(output, _)| output.warnings)
    });

    match result {
        Ok(warnings) if warnings.is_empty() => {
            println!("✅ {} - No issues found", input_path.display());
            Ok(warnings)
        }
        Ok(warnings) => {
            for warning in &warnings {
                println!("⚠️  {} - {}", input_path.display(), warning);
            }
            Ok(warnings)
        }
        Err(e) => {
            println!("❌ {} - {}", input_path.display(), e);
            Err(e)
        }
    }
}

fn check_directory(compiler: &StyleCompiler, dir_path: &str, recursive: bool) -> Result<()> {
    let paths = collect_inputs(&[dir_path.to_string()], recursive)?;
    let mut error_files = 0;
    let mut warning_count = 0;

    for path in &paths {
        match check_single_file(compiler, path) {
            Ok(warnings) => warning_count += warnings.len(),
            Err(_) => error_files += 1,
        }
    }

    println!("\n📊 Check Summary:");
    println!("   Total files: {}", paths.len());
    println!("   Files with errors: {}", error_files);
    println!("   Warnings: {}", warning_count);

    if error_files > 0 {
        Err(CompilerError::InvalidFormat {
            message: format!("{} file(s) have errors", error_files),
        })
    } else {
        Ok(())
    }
}

// --- HASH ---
pub fn handle_hash_command(cli: &super::EnhancedCli, matches: &ArgMatches) -> Result<()> {
    let property = required(matches, "property")?;
    let value = parse_cli_value(required(matches, "value")?);
    let segments: Vec<&String> = matches
        .get_many::<String>("context")
        .map(|values| values.collect())
        .unwrap_or_default();
    let options = cli.build_compiler_options(matches)?;

    for line in describe_declaration(&options, property, &value, &segments)? {
        println!("{}", line);
    }
    Ok(())
}

fn describe_declaration(
    options: &CompilerOptions,
    property: &str,
    value: &Value,
    segments: &[&String],
) -> Result<Vec<String>> {
    let mut context = ContextPath::new();
    for raw in segments {
        let segment = to_segment(raw)?;
        if context.contains(&segment) {
            return Err(CompilerError::invalid_nesting(
                context.to_string(),
                format!("'{}' is repeated", segment),
            ));
        }
        context.push(segment);
    }

    let normalized = Normalizer::new(options).normalize(property, value)?;
    let mut lines = Vec::new();
    for warning in &normalized.warnings {
        lines.push(format!("⚠️  {}", warning));
    }
    for declaration in &normalized.declarations {
        let rule = compile_rule(&options.class_name_prefix, declaration, &context);
        lines.push(rule.class_name.clone());
        lines.push(format!("   ltr: {}", rule.css.ltr));
        if let Some(rtl) = &rule.css.rtl {
            lines.push(format!("   rtl: {}", rtl));
        }
        lines.push(format!("   priority: {}", rule.priority));
    }
    Ok(lines)
}

/// Bare numbers are numeric values; everything else is literal text
fn parse_cli_value(raw: &str) -> Value {
    match raw.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Value::Number(number),
        _ => Value::String(raw.to_string()),
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(id)
        .ok_or_else(|| CompilerError::config(format!("missing argument '{}'", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BUTTON: &str = r#"{
        "create": {
            "button": { "color": "red", "marginLeft": 4 }
        },
        "keyframes": {
            "fade": { "from": { "opacity": 0 }, "to": { "opacity": 1 } }
        }
    }"#;

    const CARD: &str = r#"{
        "create": {
            "card": { "color": "red", "height": 5 }
        }
    }"#;

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("button.json"), BUTTON).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("card.json"), CARD).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a source").unwrap();
        dir
    }

    #[test]
    fn test_collect_inputs() {
        let dir = workspace();
        let root = dir.path().to_str().unwrap().to_string();

        let all = collect_inputs(&[root.clone()], true).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|path| is_source(path)));

        let top = collect_inputs(&[root], false).unwrap();
        assert_eq!(top.len(), 1);

        let empty = TempDir::new().unwrap();
        assert!(collect_inputs(&[empty.path().to_str().unwrap().to_string()], true).is_err());
    }

    #[test]
    fn test_compile_inputs_deduplicates_across_files() {
        let dir = workspace();
        let paths = collect_inputs(&[dir.path().to_str().unwrap().to_string()], true).unwrap();
        let compilation = compile_inputs(&paths, &CompilerOptions::default()).unwrap();

        // color:red is shared by both files
        assert_eq!(compilation.registry.rule_count(), 3);
        assert_eq!(compilation.registry.keyframes_count(), 1);
        assert_eq!(compilation.stats.file_count, 2);
        assert_eq!(compilation.stats.namespace_count, 2);

        let css = render(OutputFormat::Css, &compilation).unwrap();
        assert_eq!(css.matches(".x1e2nbdu{color:red}").count(), 1);
        assert!(css.starts_with("@keyframes "));

        let rtl = render(OutputFormat::Rtl, &compilation).unwrap();
        assert!(rtl.contains("margin-inline-end:4px"));
    }

    #[test]
    fn test_json_output() {
        let dir = workspace();
        let paths = vec![dir.path().join("button.json")];
        let compilation = compile_inputs(&paths, &CompilerOptions::default()).unwrap();
        let text = render(OutputFormat::Json, &compilation).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        let artifacts = json["artifacts"].as_array().unwrap();
        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[0][2], 1);
        assert_eq!(json["fingerprint"].as_str().unwrap().len(), 32);

        let styles = json["styles"].as_object().unwrap();
        let file_styles = styles.values().next().unwrap();
        assert_eq!(file_styles["button"]["color"], "x1e2nbdu");
    }

    #[test]
    fn test_inline_keyframes_shared_with_standalone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fading.json");
        fs::write(
            &path,
            r#"{
                "create": {
                    "fading": {
                        "animationName": {
                            "$keyframes": { "from": { "opacity": 0 }, "to": { "opacity": 1 } }
                        }
                    }
                },
                "keyframes": {
                    "fade": { "from": { "opacity": 0 }, "to": { "opacity": 1 } }
                }
            }"#,
        )
        .unwrap();

        let compilation = compile_inputs(&[path], &CompilerOptions::default()).unwrap();
        let (_, output) = &compilation.files[0];
        let mut ids: Vec<&str> = output.artifacts.iter().map(Artifact::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), output.artifacts.len());
        assert_eq!(compilation.registry.keyframes_count(), 1);
        assert_eq!(compilation.stats.keyframes_count, 1);
    }

    #[test]
    fn test_failed_file_aborts() {
        let dir = workspace();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, r#"{"create": {"bad": {"@font-face": {"color": "red"}}}}"#).unwrap();

        let paths = vec![dir.path().join("button.json"), broken];
        assert!(matches!(
            compile_inputs(&paths, &CompilerOptions::default()),
            Err(CompilerError::InvalidAtRule { .. })
        ));
    }

    #[test]
    fn test_describe_declaration() {
        let options = CompilerOptions::default();
        let lines = describe_declaration(&options, "color", &parse_cli_value("red"), &[]).unwrap();
        assert_eq!(lines[0], "x1e2nbdu");
        assert_eq!(lines[1], "   ltr: .x1e2nbdu{color:red}");

        let hover = ":hover".to_string();
        let lines =
            describe_declaration(&options, "start", &parse_cli_value("10"), &[&hover]).unwrap();
        assert_eq!(lines[0], "xaiupp8");
        assert!(!lines.iter().any(|line| line.starts_with("   rtl: ")));

        let lines = describe_declaration(&options, "left", &parse_cli_value("10"), &[]).unwrap();
        assert_eq!(lines[1], format!("   ltr: .{}{{inset-inline-start:10px}}", lines[0]));
        assert_eq!(lines[2], format!("   rtl: .{}{{inset-inline-end:10px}}", lines[0]));

        let repeated = describe_declaration(
            &options,
            "color",
            &parse_cli_value("red"),
            &[&hover, &hover],
        );
        assert!(matches!(repeated, Err(CompilerError::InvalidNesting { .. })));
    }

    #[test]
    fn test_parse_cli_value() {
        assert_eq!(parse_cli_value("5"), Value::Number(5.0));
        assert_eq!(parse_cli_value("5px"), Value::String("5px".to_string()));
        assert_eq!(parse_cli_value("inf"), Value::String("inf".to_string()));
    }

    #[test]
    fn test_check_reports_warnings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typo.json");
        fs::write(&path, r#"{"create": {"root": {"colr": "red"}}}"#).unwrap();

        let compiler = StyleCompiler::new(CompilerOptions::default()).unwrap();
        let warnings = check_single_file(&compiler, &path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].property, "colr");
    }
}

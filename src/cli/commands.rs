//! Command dispatch
//!
//! Editing commands load the draft document, apply one edit through the tree
//! manager and write the document back. A rejected edit leaves the file as is.

use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::document::DraftDocument;
use crate::application::payload::{Submission, Submitter};
use crate::application::IoResultExt;
use crate::cli::args::{
    AddCommands, Cli, Commands, ConfigCommands, RemoveCommands, SubmitterArgs,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::tree_view::draft_tree;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    validate, AttemptStats, BinaryHandle, CourseDraftTree, FieldPath, FieldValue,
    FileDescriptor, MediaType, NodeId, QuizResponse,
};
use crate::infrastructure::di::ServiceContainer;

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `coursedraft --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let local_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| {
            crate::infrastructure::InfraError::io("resolve working directory", e)
        })?,
    };
    let settings = Settings::load(Some(&local_dir))?;
    let container = ServiceContainer::new(settings)?;

    match command {
        Commands::New { file, title } => _new(&container, file, title.as_deref()),
        Commands::Show { file } => _show(&container, file),
        Commands::Set { file, path, value } => _set(&container, file, path, value),
        Commands::Add { command } => _add(&container, command),
        Commands::Remove { command } => _remove(&container, command),
        Commands::Validate { file } => _validate(&container, file),
        Commands::Payload { file, submitter } => _payload(&container, file, submitter),
        Commands::Submit { file, submitter } => _submit(&container, file, submitter).await,
        Commands::Courses { owner } => _courses(&container, owner).await,
        Commands::Duplicate { source, dest } => _duplicate(&container, source, dest).await,
        Commands::Grade {
            file,
            module,
            responses,
        } => _grade(&container, file, module, responses),
        Commands::Config { command } => _config(&container, command, &local_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

fn open(container: &ServiceContainer, file: &Path) -> CliResult<CourseDraftTree> {
    let document = DraftDocument::load(file)?;
    Ok(container.authoring.open_document(document)?)
}

fn save(tree: &CourseDraftTree, file: &Path) -> CliResult<()> {
    DraftDocument::from_tree(tree).save(file)?;
    Ok(())
}

/// Load, edit, save.
fn edit<T>(
    container: &ServiceContainer,
    file: &Path,
    f: impl FnOnce(&mut CourseDraftTree) -> CliResult<T>,
) -> CliResult<T> {
    let mut tree = open(container, file)?;
    let result = f(&mut tree)?;
    save(&tree, file)?;
    Ok(result)
}

fn submitter(args: &SubmitterArgs) -> Submitter {
    let submitter = Submitter::new(&args.owner);
    match &args.instructor {
        Some(name) => submitter.with_display_name(name),
        None => submitter,
    }
}

#[instrument(skip(container))]
fn _new(container: &ServiceContainer, file: &Path, title: Option<&str>) -> CliResult<()> {
    if file.exists() {
        return Err(CliError::InvalidArgs(format!(
            "{} already exists",
            file.display()
        )));
    }
    let mut tree = container.authoring.new_draft();
    if let Some(title) = title {
        tree.set_field(
            &"title".parse::<FieldPath>()?,
            FieldValue::Text(title.to_string()),
        )?;
    }
    save(&tree, file)?;
    output::action("Created", &format!("{} ({})", file.display(), tree.id()));
    Ok(())
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = open(container, file)?;
    output::info(&draft_tree(&tree));
    debug!(
        "{} nodes, depth {}",
        tree.node_count(),
        tree.arena().depth()
    );
    Ok(())
}

#[instrument(skip(container))]
fn _set(container: &ServiceContainer, file: &Path, path: &str, value: &str) -> CliResult<()> {
    let path: FieldPath = path.parse()?;
    let value = path.parse_value(value)?;
    edit(container, file, |tree| Ok(tree.set_field(&path, value)?))?;
    output::success(&format!("set {}", path));
    Ok(())
}

#[instrument(skip(container))]
fn _add(container: &ServiceContainer, command: &AddCommands) -> CliResult<()> {
    match command {
        AddCommands::Module { file } => {
            let id = edit(container, file, |tree| Ok(tree.add_module()?))?;
            output::action("Added module", &id);
        }
        AddCommands::Lesson { file, module } => {
            let id = edit(container, file, |tree| Ok(tree.add_lesson(&module.as_str().into())?))?;
            output::action("Added lesson", &id);
        }
        AddCommands::Question { file, module } => {
            let id = edit(container, file, |tree| {
                Ok(tree.add_assessment_question(&module.as_str().into())?)
            })?;
            output::action("Added question", &id);
        }
        AddCommands::AnswerOption {
            file,
            module,
            question,
        } => {
            let count = edit(container, file, |tree| {
                Ok(tree.add_question_option(&module.as_str().into(), &question.as_str().into())?)
            })?;
            output::action("Added option", &format!("{} now has {} options", question, count));
        }
        AddCommands::Files {
            file,
            module,
            lesson,
            paths,
        } => {
            let descriptors = paths
                .iter()
                .map(|p| describe_file(p))
                .collect::<CliResult<Vec<_>>>()?;
            let report = edit(container, file, |tree| {
                Ok(tree.add_complementary_files(
                    &module.as_str().into(),
                    &lesson.as_str().into(),
                    descriptors,
                )?)
            })?;
            for id in &report.accepted {
                output::success_detail(&format!("attached {}", id));
            }
            for rejection in &report.rejected {
                output::failure(rejection);
            }
            if !report.is_complete() {
                output::warning(&format!(
                    "{} file(s) rejected",
                    report.rejected.len()
                ));
            }
        }
    }
    Ok(())
}

/// Describe a file on disk; the media type is guessed from its extension.
fn describe_file(path: &Path) -> CliResult<FileDescriptor> {
    let metadata = fs::metadata(path).with_path_context("read file metadata", path)?;
    let absolute = fs::canonicalize(path).with_path_context("resolve file", path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| CliError::InvalidArgs(format!("not a file: {}", path.display())))?;
    let media_type = MediaType::from_extension(path)
        .map(|t| t.mime().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    debug!("{} detected as {}", name, media_type);
    Ok(FileDescriptor {
        name,
        media_type,
        size: metadata.len(),
        handle: BinaryHandle::Path(absolute),
    })
}

#[instrument(skip(container))]
fn _remove(container: &ServiceContainer, command: &RemoveCommands) -> CliResult<()> {
    match command {
        RemoveCommands::Module { file, module } => {
            let removed = edit(container, file, |tree| {
                Ok(tree.remove_module(&module.as_str().into())?)
            })?;
            output::action("Removed", &format!("module {} ({} nodes)", module, removed));
        }
        RemoveCommands::Lesson {
            file,
            module,
            lesson,
        } => {
            let removed = edit(container, file, |tree| {
                Ok(tree.remove_lesson(&module.as_str().into(), &lesson.as_str().into())?)
            })?;
            output::action("Removed", &format!("lesson {} ({} nodes)", lesson, removed));
        }
        RemoveCommands::Question {
            file,
            module,
            question,
        } => {
            edit(container, file, |tree| {
                Ok(tree.remove_assessment_question(
                    &module.as_str().into(),
                    &question.as_str().into(),
                )?)
            })?;
            output::action("Removed", &format!("question {}", question));
        }
        RemoveCommands::AnswerOption {
            file,
            module,
            question,
            index,
        } => {
            let value = edit(container, file, |tree| {
                Ok(tree.remove_question_option(
                    &module.as_str().into(),
                    &question.as_str().into(),
                    *index,
                )?)
            })?;
            output::action("Removed", &format!("option {} '{}'", index, value));
        }
        RemoveCommands::File {
            file,
            module,
            lesson,
            file_id,
        } => {
            edit(container, file, |tree| {
                Ok(tree.remove_complementary_file(
                    &module.as_str().into(),
                    &lesson.as_str().into(),
                    &file_id.as_str().into(),
                )?)
            })?;
            output::action("Removed", &format!("file {}", file_id));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _validate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = open(container, file)?;
    let violations = validate(&tree);
    if violations.is_empty() {
        output::success("draft is ready for submission");
        return Ok(());
    }
    output::header(&format!("{} violation(s):", violations.len()));
    for violation in &violations {
        output::failure(violation);
    }
    Err(CliError::Violations(violations.len()))
}

#[instrument(skip(container))]
fn _payload(container: &ServiceContainer, file: &Path, args: &SubmitterArgs) -> CliResult<()> {
    let tree = open(container, file)?;
    let submission = Submission::build(&tree, &submitter(args), &container.settings.payload);
    let json = serde_json::to_string_pretty(&submission.payload)
        .map_err(|e| CliError::InvalidArgs(format!("payload not serializable: {}", e)))?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
async fn _submit(container: &ServiceContainer, file: &Path, args: &SubmitterArgs) -> CliResult<()> {
    let tree = open(container, file)?;
    let outcome = container.authoring.submit(&tree, &submitter(args)).await?;
    output::action(
        "Submitted",
        &format!("course {} ({:?})", outcome.created.id, outcome.created.status),
    );
    for upload in &outcome.submission.uploads {
        let location = upload
            .handle
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "in memory".to_string());
        output::detail(&format!("upload {} from {}", upload.file_id, location));
    }
    Ok(())
}

#[instrument(skip(container))]
async fn _courses(container: &ServiceContainer, owner: &str) -> CliResult<()> {
    let courses = container.authoring.available_for_duplication(owner).await?;
    if courses.is_empty() {
        output::info("no courses available");
        return Ok(());
    }
    output::header("Available courses:");
    for course in courses {
        output::detail(&format!(
            "{}  {} ({} module(s), {:?})",
            course.id, course.title, course.module_count, course.status
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
async fn _duplicate(container: &ServiceContainer, source: &str, dest: &Path) -> CliResult<()> {
    if dest.exists() {
        return Err(CliError::InvalidArgs(format!(
            "{} already exists",
            dest.display()
        )));
    }
    let source_path = PathBuf::from(source);
    let copy = if source_path.is_file() {
        let document = DraftDocument::load(&source_path)?;
        container.authoring.duplicate_document(document)?
    } else {
        container.authoring.duplicate(&NodeId::from(source)).await?
    };
    save(&copy, dest)?;
    output::action(
        "Duplicated",
        &format!("{} -> {} ({})", source, dest.display(), copy.id()),
    );
    Ok(())
}

#[instrument(skip(container))]
fn _grade(
    container: &ServiceContainer,
    file: &Path,
    module: &str,
    responses: &[PathBuf],
) -> CliResult<()> {
    let tree = open(container, file)?;
    let module = NodeId::from(module);

    let mut reports = Vec::with_capacity(responses.len());
    for path in responses {
        let content = fs::read_to_string(path).with_path_context("read responses", path)?;
        let attempt: Vec<QuizResponse> = serde_json::from_str(&content)
            .map_err(|e| CliError::InvalidArgs(format!("{}: {}", path.display(), e)))?;

        let report = tree.grade(&module, &attempt)?;
        let summary = format!(
            "{}: {}/{} correct, score {}%",
            path.display(),
            report.correct,
            report.total,
            report.score
        );
        if report.passed {
            output::success(&format!("passed {}", summary));
        } else {
            output::failure(&format!("failed {}", summary));
        }
        reports.push(report);
    }

    if reports.len() > 1 {
        let stats = AttemptStats::from_reports(&reports);
        output::header(&format!(
            "{} attempts, average {}%, pass rate {}%",
            stats.total_attempts, stats.average_score, stats.pass_rate
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("Local", &local_config_path(local_dir).display());
        }
    }
    Ok(())
}

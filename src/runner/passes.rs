use std::io;

use tracing::info;

use classy::analysis::{self, ClassDef, Definitions, InstantiationCache, SemaError};
use classy::errors::DiagnosticMessage;
use classy::parse;
use classy::position::Position;
use classy::syntax::Sexpr;
use classy::util::is_compound;

use super::config::Stage;
use super::dump::{dump_classes, dump_programs};
use super::{PassOutput, RunnerCtx};

fn emit_sema_error(ctx: &mut RunnerCtx<'_, '_>, e: SemaError) {
    let message = DiagnosticMessage::new(format!("{}: {}", e.kind, e.message));
    let message = match e.pos {
        Some(pos) => message.with_pos(pos),
        None => message,
    };

    ctx.diagnostics
        .error()
        .with_message(message)
        .with_source(Box::new(e))
        .emit();
}

pub fn load_files(ctx: &mut RunnerCtx<'_, '_>) -> PassOutput<()> {
    for path in &ctx.config.paths {
        // the emitter borrows the source, so the mutable borrow must end first
        let result = ctx.source.borrow_mut().load(path.clone());

        if let Err(e) = result {
            ctx.diagnostics
                .error()
                .with_message(format!("could not load file {}", path.display()))
                .with_source(Box::new(e))
                .emit();
        }
    }

    ctx.stop_if_errors(())
}

pub fn parse_all(ctx: &mut RunnerCtx<'_, '_>) -> PassOutput<Vec<Vec<Sexpr>>> {
    let results = ctx
        .source
        .borrow()
        .iter()
        .map(parse::parse_file)
        .collect::<Vec<_>>();
    let mut programs = Vec::with_capacity(results.len());

    for result in results {
        match result {
            Ok(program) => programs.push(program),

            Err(e) => {
                ctx.diagnostics
                    .error()
                    .with_message(format!("syntax error: {}", e))
                    .with_error_at(e)
                    .emit();
            }
        }
    }

    ctx.stop_if_errors(programs)
}

pub fn dump_programs_if_asked(
    ctx: &mut RunnerCtx<'_, '_>,
    programs: Vec<Vec<Sexpr>>,
) -> PassOutput<Vec<Vec<Sexpr>>> {
    if ctx.config.stage != Stage::Parse {
        return PassOutput::continue_with_output(programs);
    }

    if let Some(format) = ctx.config.format {
        if let Err(e) = dump_programs(format, &programs, io::stdout()) {
            ctx.diagnostics
                .error()
                .with_message("could not dump the programs to stdout".to_owned())
                .with_source(Box::new(e))
                .emit();
        }
    }

    PassOutput::stop_with_output(programs)
}

pub fn merge_programs(
    _ctx: &mut RunnerCtx<'_, '_>,
    programs: Vec<Vec<Sexpr>>,
) -> PassOutput<Vec<Sexpr>> {
    PassOutput::continue_with_output(programs.into_iter().flatten().collect())
}

pub fn define(ctx: &mut RunnerCtx<'_, '_>, program: Vec<Sexpr>) -> PassOutput<Option<Definitions>> {
    match Definitions::from_program(program) {
        Ok(definitions) => PassOutput::continue_with_output(Some(definitions)),

        Err(e) => {
            emit_sema_error(ctx, e);

            PassOutput::stop_with_output(None)
        }
    }
}

pub fn check_has_main_class(ctx: &mut RunnerCtx<'_, '_>, definitions: &Definitions) -> PassOutput<()> {
    if !ctx.config.require_main || ctx.config.stage < Stage::Check {
        return PassOutput::r#continue();
    }

    if let Err(e) = analysis::check_has_main_class(definitions) {
        emit_sema_error(ctx, e);
    }

    ctx.stop_if_errors(())
}

pub fn instantiate_requested<'d>(
    ctx: &mut RunnerCtx<'_, '_>,
    definitions: &'d Definitions,
    cache: &'d InstantiationCache,
) -> PassOutput<Vec<&'d ClassDef>> {
    let mut classes = definitions
        .classes()
        .map(|class| &**class)
        .collect::<Vec<_>>();

    if ctx.config.stage < Stage::Check {
        return PassOutput::continue_with_output(classes);
    }

    for type_name in ctx.config.instantiate.clone() {
        if !is_compound(&type_name) && definitions.is_valid_type(&type_name) {
            ctx.diagnostics
                .warn()
                .with_message(format!("{} is not an instantiation of a template class", type_name))
                .emit();

            continue;
        }

        let known = cache.get(&type_name).is_some();

        match cache.get_or_resolve(definitions, &type_name, Position::default()) {
            Ok(_) if known => {}

            Ok(class) => {
                info!(%type_name, "instantiated");
                classes.push(class);
            }

            // requested on the command line, so there is no position in a file to report
            Err(e) if e.pos.map_or(false, |pos| pos.src.is_none()) => {
                emit_sema_error(ctx, SemaError { pos: None, ..e })
            }

            Err(e) => emit_sema_error(ctx, e),
        }
    }

    ctx.stop_if_errors(classes)
}

pub fn dump_classes_if_asked(ctx: &mut RunnerCtx<'_, '_>, classes: &[&ClassDef]) -> PassOutput<()> {
    if let Some(format) = ctx.config.format {
        if let Err(e) = dump_classes(format, classes, io::stdout()) {
            ctx.diagnostics
                .error()
                .with_message("could not dump the classes to stdout".to_owned())
                .with_source(Box::new(e))
                .emit();
        }
    }

    ctx.stop_if_errors(())
}

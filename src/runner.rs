use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use tracing::{debug, info_span};

use classy::analysis::InstantiationCache;
use classy::errors::Diagnostics;
use classy::source::{Source, SourceBuffer};

use self::config::{parse_args_or_exit, ClassyConfig};
use self::errors::print_diagnostic;

pub mod config;
mod dump;
mod errors;
mod passes;

pub enum PipelineControl {
    Continue,
    Stop,
}

pub struct PassOutput<O> {
    pub output: O,
    pub control: PipelineControl,
}

impl<O> PassOutput<O> {
    pub fn stop_with_output(output: O) -> Self {
        Self {
            output,
            control: PipelineControl::Stop,
        }
    }

    pub fn continue_with_output(output: O) -> Self {
        Self {
            output,
            control: PipelineControl::Continue,
        }
    }
}

impl PassOutput<()> {
    pub fn r#continue() -> Self {
        Self::continue_with_output(())
    }
}

pub struct RunnerCtx<'buf, 'emt> {
    pub config: ClassyConfig,
    pub source: Rc<RefCell<Source<'buf>>>,
    pub diagnostics: Diagnostics<'emt>,
}

impl RunnerCtx<'_, '_> {
    pub fn stop_if_errors<O>(&self, output: O) -> PassOutput<O> {
        if self.diagnostics.has_errors() {
            PassOutput::stop_with_output(output)
        } else {
            PassOutput::continue_with_output(output)
        }
    }

    fn exit_code(&self) -> ExitCode {
        if self.diagnostics.has_errors() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Runs a pass inside its own span, returning from the caller if the pass stops the
/// pipeline.
macro_rules! run_pass {
    ($ctx:ident, $pass:ident $(, $arg:expr )* $(,)?) => {{
        let output = {
            let _span = info_span!("pass", name = stringify!($pass)).entered();

            passes::$pass(&mut $ctx $(, $arg )*)
        };

        match output {
            PassOutput {
                control: PipelineControl::Stop,
                ..
            } => {
                debug!(pass = stringify!($pass), "the pipeline stops");

                return $ctx.exit_code();
            }

            PassOutput { output, .. } => output,
        }
    }};
}

fn run(mut ctx: RunnerCtx<'_, '_>) -> ExitCode {
    run_pass!(ctx, load_files);

    let programs = run_pass!(ctx, parse_all);
    let programs = run_pass!(ctx, dump_programs_if_asked, programs);
    let program = run_pass!(ctx, merge_programs, programs);

    let Some(definitions) = run_pass!(ctx, define, program) else {
        return ctx.exit_code();
    };
    run_pass!(ctx, check_has_main_class, &definitions);

    let cache = InstantiationCache::new();
    let classes = run_pass!(ctx, instantiate_requested, &definitions, &cache);
    run_pass!(ctx, dump_classes_if_asked, &classes);

    ctx.exit_code()
}

pub fn prepare_and_run() -> ExitCode {
    let config = parse_args_or_exit();
    let mut source_buf = SourceBuffer::new();
    let source = Rc::new(RefCell::new(Source::new(&mut source_buf)));

    let mut diagnostics = Diagnostics::new();
    diagnostics.set_emitter({
        let source = source.clone();

        Box::new(move |diagnostic| print_diagnostic(&source.borrow(), diagnostic))
    });

    run(RunnerCtx {
        config,
        source,
        diagnostics,
    })
}

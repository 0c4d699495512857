/// Processor driver that orchestrates the parse → stringify pipeline

use std::fmt::Write as _;
use std::path::PathBuf;

use cascade_lexer::Input;
use cascade_parser::{parse_input, ParseOptions, Stylesheet, Walk};
use tracing::{debug, info};

use crate::error::{ProcessError, Result};
use crate::stringify::{Stringifier, StringifyOptions, DEFAULT_ROOT_VALUE};

/// Node counts for a processed stylesheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub rules: usize,
    pub at_rules: usize,
    pub declarations: usize,
    pub comments: usize,
}

impl Stats {
    /// Count nodes by kind using the tree walkers.
    pub fn collect(sheet: &mut Stylesheet) -> Self {
        let mut stats = Stats::default();
        sheet.walk_rules(|_, _| {
            stats.rules += 1;
            Walk::Continue
        });
        sheet.walk_at_rules(|_, _| {
            stats.at_rules += 1;
            Walk::Continue
        });
        sheet.walk_decls(|_, _| {
            stats.declarations += 1;
            Walk::Continue
        });
        sheet.walk_comments(|_, _| {
            stats.comments += 1;
            Walk::Continue
        });
        stats
    }
}

/// Processing output structure
#[derive(Debug)]
pub struct ProcessOutput {
    /// Source file that was processed
    pub source_file: PathBuf,
    /// Source text as read
    pub source: String,
    /// Generated CSS
    pub css: String,
    /// The parsed stylesheet
    pub stylesheet: Stylesheet,
    pub stats: Stats,
}

/// Options for processing
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Input stylesheet
    pub input: PathBuf,
    /// Drop comments and optional whitespace
    pub minimize: bool,
    /// Rewrite px lengths to rem
    pub px2rem: bool,
    /// Pixels per rem
    pub root_value: u32,
    /// Recover from malformed input
    pub ignore_errors: bool,
    /// Log pipeline stages at info level
    pub verbose: bool,
}

impl ProcessOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            minimize: false,
            px2rem: false,
            root_value: DEFAULT_ROOT_VALUE,
            ignore_errors: false,
            verbose: false,
        }
    }

    pub fn minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    pub fn px2rem(mut self, px2rem: bool) -> Self {
        self.px2rem = px2rem;
        self
    }

    pub fn root_value(mut self, root_value: u32) -> Self {
        self.root_value = root_value;
        self
    }

    pub fn ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_value == 0 {
            return Err(ProcessError::invalid_option("root value must be greater than zero"));
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new().ignore_errors(self.ignore_errors)
    }

    pub fn stringify_options(&self) -> StringifyOptions {
        StringifyOptions::new()
            .minimize(self.minimize)
            .px2rem(self.px2rem)
            .root_value(self.root_value)
    }
}

/// The cascade processor
pub struct Processor {
    options: ProcessOptions,
}

impl Processor {
    /// Create a new processor with the given options
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Read, parse and regenerate the input file
    pub fn process(&self) -> Result<ProcessOutput> {
        let source = self.read_source()?;
        self.process_source(source)
    }

    /// Run the pipeline on in-memory text; `options.input` only labels errors.
    pub fn process_source(&self, source: impl Into<String>) -> Result<ProcessOutput> {
        self.options.validate()?;
        let source = source.into();
        let file = &self.options.input;

        if self.options.verbose {
            info!(file = %file.display(), bytes = source.len(), "processing");
        }

        let mut stylesheet = {
            let input = Input::new(&source);
            parse_input(&input, self.options.parse_options())
                .map_err(|e| ProcessError::parse(file, e))?
        };
        let stats = Stats::collect(&mut stylesheet);
        debug!(?stats, "parse successful");

        let mut css = String::with_capacity(source.len());
        write!(css, "{}", Stringifier::new(&stylesheet, self.options.stringify_options()))?;

        if self.options.verbose {
            info!(
                file = %file.display(),
                bytes = css.len(),
                rules = stats.rules,
                declarations = stats.declarations,
                "generated css"
            );
        } else {
            debug!(bytes = css.len(), "generated css");
        }

        Ok(ProcessOutput {
            source_file: file.clone(),
            source,
            css,
            stylesheet,
            stats,
        })
    }

    /// Read the source file
    fn read_source(&self) -> Result<String> {
        if !self.options.input.exists() {
            return Err(ProcessError::FileNotFound(self.options.input.clone()));
        }

        std::fs::read_to_string(&self.options.input).map_err(ProcessError::from)
    }
}

// Common test utilities shared by the integration tests.
// Sessions run against the mock console; output is inspected as a transcript.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use linekit::prelude::*;
use linekit::create_mock_console_io;

/// Interrupt (Ctrl+C)
pub const CTRL_C: u8 = 0x03;
/// End of input (Ctrl+D)
pub const CTRL_D: u8 = 0x04;
pub const ESC: u8 = 0x1b;
pub const DEL: u8 = 0x7f;

/// Scripted outcome of one `eval` call.
#[derive(Debug, Clone)]
pub enum Response {
    Value(String),
    NeedMore,
    Fail(String),
}

#[derive(Debug)]
struct ScriptedError(String);

impl std::fmt::Display for ScriptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ScriptedError {}

/// Handler that records every callback and answers from a script.
///
/// Lines without a scripted response evaluate to themselves.
#[derive(Debug, Default)]
pub struct ScriptedHandler {
    pub prompt: String,
    pub seed: Vec<String>,
    pub responses: VecDeque<Response>,
    pub completion: Completion,
    pub started: usize,
    pub stopped: Option<Vec<String>>,
    pub stop_calls: usize,
    pub evals: Vec<String>,
    pub completions: Vec<String>,
    pub resets: usize,
}

impl ScriptedHandler {
    pub fn new(prompt: &str) -> Self {
        ScriptedHandler {
            prompt: prompt.to_string(),
            ..ScriptedHandler::default()
        }
    }

    pub fn respond(mut self, response: Response) -> Self {
        self.responses.push_back(response);
        self
    }

    pub fn with_seed(mut self, seed: &[&str]) -> Self {
        self.seed = seed.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }
}

impl ReplHandler for ScriptedHandler {
    type Output = String;

    fn start(&mut self) -> Vec<String> {
        self.started += 1;
        self.seed.clone()
    }

    fn stop(&mut self, history: &[String]) {
        self.stop_calls += 1;
        self.stopped = Some(history.to_vec());
    }

    fn prompt(&self) -> String {
        self.prompt.clone()
    }

    fn eval(&mut self, line: &str) -> Result<Evaluation<String>, EvalError> {
        self.evals.push(line.to_string());
        match self.responses.pop_front() {
            Some(Response::Value(value)) => Ok(Evaluation::Value(value)),
            Some(Response::NeedMore) => Ok(Evaluation::NeedMore),
            Some(Response::Fail(message)) => Err(Box::new(ScriptedError(message))),
            None => Ok(Evaluation::Value(line.to_string())),
        }
    }

    fn complete(&mut self, text: &str) -> Completion {
        self.completions.push(text.to_string());
        self.completion.clone()
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// A finished mock session.
pub struct Session<H: ReplHandler> {
    pub engine: ReplEngine<H>,
    pub input: MockConsoleInput,
    pub output: MockConsoleOutput,
    pub result: Result<(), ReplError>,
}

impl<H: ReplHandler> Session<H> {
    pub fn handler(&self) -> &H {
        self.engine.handler()
    }

    /// Raw output as text.
    pub fn raw(&self) -> String {
        self.output.get_output_string()
    }

    /// Output with control sequences spelled out, see [`visible`].
    pub fn transcript(&self) -> String {
        visible(&self.raw())
    }
}

/// Configuration used by tests: no bracket-match pause.
pub fn test_config() -> ReplConfig {
    ReplConfig {
        highlight_pause: Duration::ZERO,
        ..ReplConfig::default()
    }
}

/// Run `handler` over `script` with [`test_config`].
pub fn run_script<H: ReplHandler>(handler: H, script: &[u8]) -> Session<H> {
    run_script_with(test_config(), handler, script, |_| {})
}

/// Run with a custom configuration, letting `prepare` adjust the mock input first.
pub fn run_script_with<H, F>(config: ReplConfig, handler: H, script: &[u8], prepare: F) -> Session<H>
where
    H: ReplHandler,
    F: FnOnce(&MockConsoleInput),
{
    let (input, output) = create_mock_console_io(script);
    prepare(&input);
    let mut engine = ReplEngine::new(
        config,
        Box::new(input.clone()),
        Box::new(output.clone()),
        handler,
    )
    .expect("valid test configuration");
    let result = engine.run();
    Session {
        engine,
        input,
        output,
        result,
    }
}

/// Spell out terminal control output so transcripts read on one line.
///
/// `<CR>` carriage return, `<LF>` newline, `<L>`/`<R>` cursor left/right,
/// `<BEL>` audible signal.
pub fn visible(raw: &str) -> String {
    raw.replace("\x1b[1D", "<L>")
        .replace("\x1b[1C", "<R>")
        .replace('\r', "<CR>")
        .replace('\n', "<LF>")
        .replace('\x07', "<BEL>")
}

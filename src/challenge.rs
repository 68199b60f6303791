//! Anti-bot challenge solving.
//!
//! Clearing the exchange's challenge page needs a real browser engine. The
//! engine lives outside this crate; [`ChallengeSolver`] is the boundary and
//! [`CommandSolver`] drives an external headless-browser script through a
//! small command-line protocol:
//!
//! ```text
//! <program> <args..> <url> [<post body> <headers as query string>]
//! ```
//!
//! The script prints the browser's cookies as a JSON array on stdout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::YobitError;
use crate::session::{Cookie, parse_http_date};

/// Environment variable holding the solver command line.
pub const SOLVER_COMMAND_VAR: &str = "YOBIT_CHALLENGE_SOLVER";

/// Default upper bound on one solve.
pub const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(30);

/// The request that triggered the challenge, to be replayed by the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    /// Target URL
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// POST body, exactly as sent
    pub body: Option<String>,
    /// Headers the request carried (signature and key for trade calls)
    pub headers: Vec<(String, String)>,
}

/// Obtains fresh clearance cookies for a challenged request.
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Solve the challenge protecting `request`.
    async fn solve(&self, request: &ChallengeRequest) -> Result<Vec<Cookie>, YobitError>;
}

/// Solver used when none is configured. Every solve fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSolver;

#[async_trait]
impl ChallengeSolver for UnavailableSolver {
    async fn solve(&self, _request: &ChallengeRequest) -> Result<Vec<Cookie>, YobitError> {
        Err(YobitError::Challenge(format!(
            "no challenge solver configured (set {SOLVER_COMMAND_VAR})"
        )))
    }
}

/// Cookie as printed by the browser script.
#[derive(Debug, Deserialize)]
struct BrowserCookie {
    name: String,
    value: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    expiry: Option<i64>,
    #[serde(default)]
    expires: Option<String>,
    #[serde(default, alias = "httpOnly")]
    httponly: bool,
    #[serde(default)]
    secure: bool,
}

impl From<BrowserCookie> for Cookie {
    fn from(raw: BrowserCookie) -> Self {
        Self {
            name: raw.name,
            value: raw.value,
            domain: raw.domain,
            path: raw.path,
            expires: raw
                .expiry
                .or_else(|| raw.expires.as_deref().and_then(parse_http_date)),
            http_only: raw.httponly,
            secure: raw.secure,
        }
    }
}

/// Runs an external command that solves the challenge in a headless browser.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use yobit_api_client::challenge::CommandSolver;
///
/// let solver = CommandSolver::new("phantomjs")
///     .arg("/opt/yobit/cloudflare-challenge.js")
///     .timeout(Duration::from_secs(20));
/// ```
#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSolver {
    /// Create a solver running `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_SOLVER_TIMEOUT,
        }
    }

    /// Build a solver from `$YOBIT_CHALLENGE_SOLVER`, a whitespace separated
    /// command line such as `phantomjs /opt/cloudflare-challenge.js`.
    pub fn from_env() -> Option<Self> {
        let command_line = std::env::var(SOLVER_COMMAND_VAR).ok()?;
        Self::from_command_line(&command_line)
    }

    /// Build a solver from a whitespace separated command line.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program).args(words))
    }

    /// Append a leading argument (typically the script path).
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append leading arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Bound the time a single solve may take.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments appended after the configured ones for `request`.
    fn request_args(request: &ChallengeRequest) -> Result<Vec<String>, YobitError> {
        let mut args = vec![request.url.clone()];
        if request.method == Method::POST {
            args.push(request.body.clone().unwrap_or_default());
            let headers = serde_urlencoded::to_string(&request.headers)
                .map_err(|e| YobitError::Challenge(e.to_string()))?;
            args.push(headers);
        }
        Ok(args)
    }

    /// Parse the script's stdout.
    fn parse_cookies(stdout: &str) -> Result<Vec<Cookie>, YobitError> {
        let stdout = stdout.trim();
        if stdout.is_empty() {
            return Err(YobitError::Challenge("solver printed nothing".to_string()));
        }
        let raw: Vec<BrowserCookie> = serde_json::from_str(stdout)
            .map_err(|e| YobitError::Challenge(format!("unreadable solver output: {e}")))?;
        if raw.is_empty() {
            return Err(YobitError::Challenge("solver returned no cookies".to_string()));
        }
        Ok(raw.into_iter().map(Cookie::from).collect())
    }
}

#[async_trait]
impl ChallengeSolver for CommandSolver {
    async fn solve(&self, request: &ChallengeRequest) -> Result<Vec<Cookie>, YobitError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .args(Self::request_args(request)?)
            .kill_on_drop(true);

        tracing::debug!(program = %self.program, url = %request.url, "Running challenge solver");
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                YobitError::Challenge(format!("solver timed out after {:?}", self.timeout))
            })??;

        if !output.status.success() {
            return Err(YobitError::Challenge(format!(
                "solver exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Self::parse_cookies(&String::from_utf8_lossy(&output.stdout))
    }
}

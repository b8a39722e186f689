//! Interactive front desk: customers arrive, tellers call the next one.

use teller_core::{BankBranch, BranchError, ConfiguredSelector, Customer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

pub const HELP: &str = "\
commands:
  add <name>    a customer arrives and joins the shortest line
  next <line>   teller <line> calls their next customer
  status        show every line
  json          show every line as JSON
  help          show this message
  quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Next(i64),
    Status,
    Json,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Branch(#[from] BranchError),

    #[error("failed to encode status: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word {
            "" => return Ok(None),
            "add" if rest.is_empty() => return Err(ShellError::Usage("add <name>")),
            "add" => Self::Add(rest.to_string()),
            "next" => Self::Next(rest.parse().map_err(|_| ShellError::Usage("next <line>"))?),
            "status" => Self::Status,
            "json" => Self::Json,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ShellError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

pub struct Shell {
    branch: BankBranch<Customer, ConfiguredSelector>,
}

impl Shell {
    pub fn new(branch: BankBranch<Customer, ConfiguredSelector>) -> Self {
        Self { branch }
    }

    /// Run one command and return the text to show.
    pub fn execute(&mut self, command: ShellCommand) -> Result<String, ShellError> {
        let reply = match command {
            ShellCommand::Add(name) => {
                let line = self.branch.enqueue(Customer::new(name.clone()));
                format!("{name} joined line {}", line.index())
            }
            ShellCommand::Next(index) => {
                let line = self.branch.line_id(index)?;
                match self.branch.dequeue_from(line.index())? {
                    Some(customer) => format!("line {}: now serving {customer}", line.index()),
                    None => format!("line {}: nobody waiting", line.index()),
                }
            }
            ShellCommand::Status => self.branch.to_string().trim_end().to_string(),
            ShellCommand::Json => serde_json::to_string_pretty(&self.branch.status())?,
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => String::new(),
        };
        Ok(reply)
    }
}

pub async fn run(branch: BankBranch<Customer, ConfiguredSelector>) -> std::io::Result<()> {
    info!(tellers = branch.lines(), "branch open");
    println!("{HELP}");

    let mut shell = Shell::new(branch);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ShellCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => match shell.execute(command) {
                Ok(reply) => println!("{reply}"),
                Err(e) => eprintln!("error: {e}"),
            },
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

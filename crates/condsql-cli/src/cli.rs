use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Select,
    Insert,
    Update,
    Delete,
    Search,
}

impl HelpTopic {
    fn command_name(self) -> &'static str {
        match self {
            HelpTopic::Root => "condsql",
            HelpTopic::Select => "select",
            HelpTopic::Insert => "insert",
            HelpTopic::Update => "update",
            HelpTopic::Delete => "delete",
            HelpTopic::Search => "search",
        }
    }

    fn allowed_options(self) -> &'static [&'static str] {
        match self {
            HelpTopic::Root => &[],
            HelpTopic::Select => &[
                "--table", "--join", "--on", "--natural", "--where", "--columns", "--post",
            ],
            HelpTopic::Insert => &["--table", "--join", "--on", "--natural", "--row"],
            HelpTopic::Update => &["--table", "--join", "--on", "--natural", "--where", "--set"],
            HelpTopic::Delete => &["--table", "--join", "--on", "--natural", "--where"],
            HelpTopic::Search => &["--table", "--keyword", "--column", "--limit", "--schema"],
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Select(SelectArgs),
    Insert(InsertArgs),
    Update(UpdateArgs),
    Delete(DeleteArgs),
    Search(SearchArgs),
}

/// How a `--join` table attaches to what came before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinSpec {
    Natural,
    /// Raw JSON object such as `{"Pet": "breed_name", "Breed": "name"}`.
    On(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinArg {
    pub table: String,
    pub spec: JoinSpec,
}

/// The table a statement works on, possibly joined with others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetArgs {
    pub table: String,
    pub joins: Vec<JoinArg>,
}

#[derive(Debug, Clone)]
pub struct SelectArgs {
    pub target: TargetArgs,
    pub where_json: Option<String>,
    pub columns: Vec<String>,
    pub post_json: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InsertArgs {
    pub target: TargetArgs,
    pub row_json: String,
}

#[derive(Debug, Clone)]
pub struct UpdateArgs {
    pub target: TargetArgs,
    pub where_json: Option<String>,
    pub set_json: String,
}

#[derive(Debug, Clone)]
pub struct DeleteArgs {
    pub target: TargetArgs,
    pub where_json: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchArgs {
    /// Explicit `--schema`; otherwise `condsql.toml` if present, else the
    /// built-in pet shop schema.
    pub schema: Option<PathBuf>,
    pub table: Option<String>,
    pub keyword: String,
    pub column: Option<String>,
    pub limit: Option<u64>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(String::as_str);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let topic = match first {
        "-h" | "--help" => return Ok(Command::Help(HelpTopic::Root)),
        "select" => HelpTopic::Select,
        "insert" => HelpTopic::Insert,
        "update" => HelpTopic::Update,
        "delete" => HelpTopic::Delete,
        "search" => HelpTopic::Search,
        _ => anyhow::bail!("unknown command: {first}"),
    };

    let opts = parse_options(it)?;
    if opts.help {
        return Ok(Command::Help(topic));
    }
    let allowed = topic.allowed_options();
    if let Some(flag) = opts.seen.iter().find(|f| !allowed.contains(*f)) {
        anyhow::bail!("{flag} is not valid for `condsql {}`", topic.command_name());
    }

    Ok(match topic {
        HelpTopic::Root => Command::Help(HelpTopic::Root),
        HelpTopic::Select => Command::Select(SelectArgs {
            target: opts.target()?,
            where_json: opts.where_json,
            columns: opts.columns,
            post_json: opts.post_json,
        }),
        HelpTopic::Insert => Command::Insert(InsertArgs {
            target: opts.target()?,
            row_json: opts.row_json.context("insert requires --row <JSON>")?,
        }),
        HelpTopic::Update => Command::Update(UpdateArgs {
            target: opts.target()?,
            where_json: opts.where_json,
            set_json: opts.set_json.context("update requires --set <JSON>")?,
        }),
        HelpTopic::Delete => Command::Delete(DeleteArgs {
            target: opts.target()?,
            where_json: opts.where_json,
        }),
        HelpTopic::Search => Command::Search(SearchArgs {
            schema: opts.schema,
            table: opts.table,
            keyword: opts.keyword.unwrap_or_default(),
            column: opts.column,
            limit: opts.limit,
        }),
    })
}

#[derive(Debug, Default)]
struct RawOptions {
    help: bool,
    seen: Vec<&'static str>,
    table: Option<String>,
    joins: Vec<(String, Option<JoinSpec>)>,
    where_json: Option<String>,
    columns: Vec<String>,
    post_json: Option<String>,
    row_json: Option<String>,
    set_json: Option<String>,
    keyword: Option<String>,
    column: Option<String>,
    limit: Option<u64>,
    schema: Option<PathBuf>,
}

impl RawOptions {
    fn target(&self) -> anyhow::Result<TargetArgs> {
        let Some(table) = &self.table else {
            anyhow::bail!("--table is required");
        };
        let mut joins = Vec::with_capacity(self.joins.len());
        for (join_table, spec) in &self.joins {
            let Some(spec) = spec else {
                anyhow::bail!("--join {join_table} needs --on <JSON> or --natural");
            };
            joins.push(JoinArg {
                table: join_table.clone(),
                spec: spec.clone(),
            });
        }
        Ok(TargetArgs {
            table: table.clone(),
            joins,
        })
    }

    fn set_join_spec(&mut self, flag: &str, spec: JoinSpec) -> anyhow::Result<()> {
        let Some((table, slot)) = self.joins.last_mut() else {
            anyhow::bail!("{flag} must follow --join <TABLE>");
        };
        if slot.is_some() {
            anyhow::bail!("{flag}: --join {table} already has a join condition");
        }
        *slot = Some(spec);
        Ok(())
    }
}

fn parse_options<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<RawOptions> {
    let mut opts = RawOptions::default();

    while let Some(token) = it.next() {
        // `--flag=value` and `--flag value` are both accepted.
        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (token, None),
        };
        let mut value = |name: &str| -> anyhow::Result<String> {
            match inline {
                Some(v) => Ok(v.to_string()),
                None => it
                    .next()
                    .map(str::to_string)
                    .with_context(|| format!("{name} requires a value")),
            }
        };

        let name: &'static str = match flag {
            "-h" | "--help" => {
                opts.help = true;
                continue;
            }
            "--table" => {
                opts.table = Some(value("--table")?);
                "--table"
            }
            "--join" => {
                opts.joins.push((value("--join")?, None));
                "--join"
            }
            "--on" => {
                let raw = value("--on")?;
                opts.set_join_spec("--on", JoinSpec::On(raw))?;
                "--on"
            }
            "--natural" => {
                opts.set_join_spec("--natural", JoinSpec::Natural)?;
                "--natural"
            }
            "--where" => {
                opts.where_json = Some(value("--where")?);
                "--where"
            }
            "--columns" => {
                opts.columns = value("--columns")?
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect();
                "--columns"
            }
            "--post" => {
                opts.post_json = Some(value("--post")?);
                "--post"
            }
            "--row" => {
                opts.row_json = Some(value("--row")?);
                "--row"
            }
            "--set" => {
                opts.set_json = Some(value("--set")?);
                "--set"
            }
            "--keyword" => {
                opts.keyword = Some(value("--keyword")?);
                "--keyword"
            }
            "--column" => {
                opts.column = Some(value("--column")?);
                "--column"
            }
            "--limit" => {
                let raw = value("--limit")?;
                opts.limit = Some(
                    raw.parse()
                        .with_context(|| format!("invalid --limit value: {raw}"))?,
                );
                "--limit"
            }
            "--schema" => {
                opts.schema = Some(PathBuf::from(value("--schema")?));
                "--schema"
            }
            other => anyhow::bail!("unknown argument: {other}"),
        };
        if !opts.seen.contains(&name) {
            opts.seen.push(name);
        }
    }

    Ok(opts)
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
condsql - compile document-style conditions into MySQL statements

USAGE:
  condsql <COMMAND> [OPTIONS]

COMMANDS:
  select        Build a SELECT
  insert        Build an INSERT
  update        Build an UPDATE
  delete        Build a DELETE
  search        Build a keyword search SELECT

The SQL is printed to stdout. Set RUST_LOG=condsql=debug to trace building.
Run `condsql <command> --help` for more."
            );
        }
        HelpTopic::Select => {
            println!(
                "\
USAGE:
  condsql select --table <NAME> [OPTIONS]

OPTIONS:
  --table <NAME>        Table to read
  --join <TABLE>        Join another table (repeatable, needs --on or --natural)
  --on <JSON>           Join columns, e.g. '{{\"Pet\": \"breed_name\", \"Breed\": \"name\"}}'
  --natural             Natural join on same-named columns
  --where <JSON>        Condition, e.g. '{{\"$or\": [{{\"a\": 1}}, {{\"b\": {{\"$gt\": 2}}}}]}}'
  --columns <a,b>       Columns to return (default: *)
  --post <JSON>         Post-processing, e.g. '{{\"$sort\": {{\"a\": -1}}, \"$limit\": 10}}'
  -h, --help            Print help"
            );
        }
        HelpTopic::Insert => {
            println!(
                "\
USAGE:
  condsql insert --table <NAME> --row <JSON>

OPTIONS:
  --table <NAME>        Table to insert into
  --row <JSON>          Column values, e.g. '{{\"name\": \"Rex\", \"height\": 40}}'
  -h, --help            Print help

Joined tables (--join) are read-only and are refused."
            );
        }
        HelpTopic::Update => {
            println!(
                "\
USAGE:
  condsql update --table <NAME> --set <JSON> [--where <JSON>]

OPTIONS:
  --table <NAME>        Table to update
  --set <JSON>          Column values to assign
  --where <JSON>        Rows to update (default: all)
  -h, --help            Print help

Joined tables (--join) are read-only and are refused."
            );
        }
        HelpTopic::Delete => {
            println!(
                "\
USAGE:
  condsql delete --table <NAME> [--where <JSON>]

OPTIONS:
  --table <NAME>        Table to delete from
  --where <JSON>        Rows to delete (default: all)
  -h, --help            Print help

Joined tables (--join) are read-only and are refused."
            );
        }
        HelpTopic::Search => {
            println!(
                "\
USAGE:
  condsql search [OPTIONS]

OPTIONS:
  --keyword <WORDS>     Space-separated words (default: match every row)
  --table <NAME>        Table to search (default: Pet)
  --column <NAME>       Only match this searchable column
  --limit <N>           Maximum number of rows
  --schema <FILE>       Search schema (default: condsql.toml, else built-in)
  -h, --help            Print help"
            );
        }
    }
}

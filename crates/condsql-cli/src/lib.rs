mod cli;
mod commands;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    let sql = match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            return Ok(());
        }
        cli::Command::Select(args) => commands::select(&args)?,
        cli::Command::Insert(args) => commands::insert(&args)?,
        cli::Command::Update(args) => commands::update(&args)?,
        cli::Command::Delete(args) => commands::delete(&args)?,
        cli::Command::Search(args) => commands::search(&args)?,
    };
    println!("{sql}");
    Ok(())
}

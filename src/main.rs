use smart_search::{cli_parse, init_logger, run};

fn main() -> anyhow::Result<()> {
    let cli = cli_parse();
    init_logger(cli.log_level());
    run(cli)
}

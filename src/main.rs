use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use simple_logger::SimpleLogger;
use trans_shield::engine::{
    BatchEvaluator, LocalHeuristicScorer, RemoteScorer, Verdict, VerdictRow, evaluate_file_remote,
};

fn main() -> Result<()> {
    SimpleLogger::new().env().init()?;

    log::debug!("Application started");

    let (path, remote_url) = parse_args()?;

    log::debug!("Transaction scoring: Starting");
    let verdicts = score_transactions(&path, remote_url.as_deref())?;
    log::debug!("Transaction scoring: Done");

    log::debug!("Exporting verdicts to stdout: Started");
    write_to_std_out(&verdicts)?;
    log::debug!("Exporting verdicts to stdout: Done");

    log::debug!("Application finished");

    Ok(())
}

/// Usage: trans_shield <transactions.csv> [--remote <backend-url>]
fn parse_args() -> Result<(PathBuf, Option<String>)> {
    let mut args = env::args().skip(1);

    let path = match args.next() {
        Some(p) => PathBuf::from(p),
        None => bail!("expected a CSV file path argument"),
    };
    log::debug!("Extracted filepath from args: {path:?}");

    let remote_url = match args.next() {
        Some(flag) if flag == "--remote" => {
            Some(args.next().context("--remote requires a backend URL")?)
        }
        Some(other) => bail!("unrecognized argument: {other}"),
        None => None,
    };

    Ok((path, remote_url))
}

fn score_transactions(path: &Path, remote_url: Option<&str>) -> Result<Vec<Verdict>> {
    match remote_url {
        Some(url) => {
            log::debug!("Using remote scoring backend at {url}");
            let scorer = RemoteScorer::new(url);
            evaluate_file_remote(&scorer, path)
                .with_context(|| format!("remote evaluation of {path:?} failed"))
        }
        None => {
            let evaluator = BatchEvaluator::new(LocalHeuristicScorer::new());
            evaluator
                .evaluate_file(path)
                .with_context(|| format!("evaluation of {path:?} failed"))
        }
    }
}

fn write_to_std_out(verdicts: &[Verdict]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());

    log::debug!("Starting verdict serialisation");
    for verdict in verdicts {
        log::debug!("Serialising verdict: {verdict:?}");
        wtr.serialize(VerdictRow::from(verdict))?;
    }

    log::debug!("Verdict serialisation done -> Flushing to stdout");
    wtr.flush()?;

    Ok(())
}

use anyhow::{bail, Context, Result};
use claimlens::init_logging;
use claimlens::models::{RunNotice, VerificationReport};
use claimlens::services::{ClaimVerifier, TavilyClient, VerdictCache};

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn print_report(report: &VerificationReport) {
    println!("Claims: {}", report.claims.len());
    for (i, claim) in report.claims.iter().enumerate() {
        println!(
            "[C{:03}] {:<10} {}",
            i,
            claim.classification.as_str(),
            preview(&claim.original_text, 120)
        );
    }
    println!();

    println!("Verdicts: {}", report.verdicts.len());
    for verdict in &report.verdicts {
        let claim_text = report
            .claims
            .iter()
            .find(|c| c.id == verdict.claim_id)
            .map(|c| preview(&c.original_text, 80))
            .unwrap_or_default();
        println!(
            "[{}] confidence={:.2}  {}",
            verdict.verdict.as_str().to_uppercase(),
            verdict.confidence,
            claim_text
        );
        println!("  {}", verdict.explanation);
        for citation in &verdict.citations {
            println!("  - {} ({})", citation.source, citation.url);
        }
        for warning in &verdict.warnings {
            println!("  ! {}", warning);
        }
    }

    match report.notice {
        Some(RunNotice::NoClaimsFound) => println!("No claims were found in the input."),
        Some(RunNotice::NoFactualClaims) => {
            println!("No factual claims to verify; nothing was searched.")
        }
        None => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  verify_text -- <text> [--file <path.txt>] [--no-cache] [--out <json_path>]\n\nNotes:\n  - Requires TAVILY_API_KEY in the environment.\n  - `--file` reads the input text from a file instead of the argument.\n  - `--no-cache` skips the local verdict cache for this run."
        );
        return Ok(());
    }

    let text = match parse_arg_value(&args, "--file") {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("read file failed: {}", path))?,
        None => args[1].clone(),
    };
    if text.trim().is_empty() {
        bail!("input text is empty");
    }
    let no_cache = has_flag(&args, "--no-cache");
    let out_path = parse_arg_value(&args, "--out");

    let provider = TavilyClient::from_env().context("search provider not configured")?;
    let cache = if no_cache {
        None
    } else {
        VerdictCache::default_cache_dir().map(VerdictCache::new)
    };
    let verifier = ClaimVerifier::new(provider).with_cache(cache);

    let report = verifier
        .verify(&text)
        .await
        .context("verification run failed")?;

    print_report(&report);

    if let Some(out_path) = out_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&out_path, json)
            .with_context(|| format!("write out failed: {}", out_path))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}

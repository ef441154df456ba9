//! Run Eevo forms from a file (or stdin) and print one result per form.
//!
//! Output lines are `INDEX<TAB>FORM<TAB>RESULT`.  Warnings go to stderr.

use std::fs;
use std::io::{self, Read};

use eevo_core::eevo::{format_eval_result, parse_forms, print_expr, EvalConfig, Evaluator};

fn read_source(path: Option<&str>) -> io::Result<String> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(path),
    }
}

fn main() {
    let _ = env_logger::try_init();

    let path = std::env::args().nth(1);
    if matches!(path.as_deref(), Some("-h" | "--help")) {
        eprintln!("usage: eevo [FILE|-]");
        std::process::exit(2);
    }

    let source = match read_source(path.as_deref()) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!(
                "failed to read {}: {err}",
                path.as_deref().unwrap_or("<stdin>")
            );
            std::process::exit(2);
        }
    };

    let forms = match parse_forms(&source) {
        Ok(forms) => forms,
        Err(err) => {
            eprintln!("failed to parse forms: {err}");
            std::process::exit(2);
        }
    };

    let config = EvalConfig::from_env();
    log::debug!("evaluating {} forms with {config:?}", forms.len());
    let mut evaluator = Evaluator::with_config(config);
    for (index, form) in forms.iter().enumerate() {
        let result = evaluator.eval_expr(form);
        for warning in evaluator.take_warnings() {
            eprintln!("; warning: {warning}");
        }
        println!("{}\t{}\t{}", index + 1, print_expr(form), format_eval_result(&result));
    }
}

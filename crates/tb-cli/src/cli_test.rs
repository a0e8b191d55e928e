use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_apply_flags() {
    let cli = Cli::parse_from(["tb", "apply", "checkout.json", "--dry-run", "-t", ":memory:"]);
    match cli.command {
        Commands::Apply(args) => {
            assert_eq!(args.scenario, "checkout.json");
            assert!(args.dry_run);
            assert!(!args.serve);
            assert_eq!(args.output, OutputFormat::Text);
        }
        other => panic!("expected apply, got {:?}", other),
    }
    assert_eq!(cli.global.target.as_deref(), Some(":memory:"));
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::parse_from(["tb", "ls", "--verbose", "-p", "proj"]);
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, "proj");
}

#[test]
fn test_constants_help_explains_token_boundary() {
    let mut cmd = Cli::command();
    let constants = cmd.find_subcommand_mut("constants").unwrap();
    let help = constants.render_long_help().to_string();
    assert!(help.contains("order_$SEQ_1"));
    assert!(help.contains("letter"));
}

mod common;

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const BIN_NAME: &str = "fintrack_cli";

fn script_command(home: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("FINTRACK_CLI_SCRIPT", "1").env("FINTRACK_HOME", home);
    cmd
}

#[test]
fn script_mode_runs_the_basic_flow() {
    let home = common::isolated_home();
    let input = "\
user alice
/createcategory Food expense
/add 500 Food lunch
/today
exit
";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(
            contains("linked to this chat")
                .and(contains("Category 'Food' added"))
                .and(contains("Recorded: 500.00 ₽ (Food)"))
                .and(contains("Report for today")),
        );
}

#[test]
fn budget_command_prints_the_analysis() {
    let home = common::isolated_home();
    let input = "\
user bob
/createcategory Salary income
/budget 50000 35000
exit
";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Budget for").and(contains("Budget analysis")));
}

#[test]
fn help_works_without_a_linked_account() {
    let home = common::isolated_home();
    script_command(&home)
        .write_stdin("/help\nexit\n")
        .assert()
        .success()
        .stdout(contains("/today").and(contains("/budget")));
}

#[test]
fn data_survives_across_invocations() {
    let home = common::isolated_home();

    script_command(&home)
        .write_stdin("user alice\n/createcategory Food expense\n/add 120.55 Food\nexit\n")
        .assert()
        .success()
        .stdout(contains("Recorded: 120.55 ₽ (Food)"));

    // The second run resumes the linked chat from the snapshot.
    script_command(&home)
        .write_stdin("/today\nexit\n")
        .assert()
        .success()
        .stdout(contains("Expenses: 120.55 ₽"));
}

#[test]
fn digest_command_reports_delivery_count() {
    let home = common::isolated_home();
    script_command(&home)
        .write_stdin("user alice\ndigest\nexit\n")
        .assert()
        .success()
        .stdout(contains("Digest delivered to 1 recipient(s).").and(contains("Spent today")));
}

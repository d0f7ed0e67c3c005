//! Integration tests for the `pmake` binary using `assert_cmd`.
//!
//! These tests run the compiled binary inside scratch workspaces and check the
//! echoed commands, the files actions produce, and the exit status.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use test_support::{Workspace, fake_program};

const TOUCH_APP: &str = "app : main.o\n\ttouch app\n";

fn pmake() -> Result<Command> {
    Command::cargo_bin("pmake").context("locate pmake binary")
}

#[test]
fn builds_default_target_and_echoes_commands() -> Result<()> {
    let work = Workspace::with_makefile(TOUCH_APP)?;
    work.file_at("main.o", 100)?;
    pmake()?
        .current_dir(work.root())
        .assert()
        .success()
        .stdout("touch app\n");
    ensure!(work.exists("app"), "action should create app");
    Ok(())
}

#[test]
fn second_run_has_nothing_to_do() -> Result<()> {
    let work = Workspace::with_makefile(TOUCH_APP)?;
    work.file_at("main.o", 100)?;
    pmake()?.current_dir(work.root()).assert().success();
    pmake()?
        .current_dir(work.root())
        .assert()
        .success()
        .stdout("");
    Ok(())
}

#[test]
fn parallel_flag_builds_every_prerequisite() -> Result<()> {
    let work = Workspace::with_makefile(
        "all : left right\n\ttouch all\nleft :\n\ttouch left\nright :\n\ttouch right\n",
    )?;
    pmake()?
        .current_dir(work.root())
        .arg("--parallel")
        .assert()
        .success()
        .stdout(predicate::str::contains("touch left"))
        .stdout(predicate::str::contains("touch right"))
        .stdout(predicate::str::ends_with("touch all\n"));
    for name in ["left", "right", "all"] {
        ensure!(work.exists(name), "{name} should exist");
    }
    Ok(())
}

#[test]
fn file_and_directory_options_locate_the_makefile() -> Result<()> {
    let work = Workspace::new()?;
    std::fs::create_dir(work.path("sub")).context("create sub")?;
    work.write("sub/rules.mk", "stamp :\n\ttouch stamp\n")?;
    pmake()?
        .current_dir(work.root())
        .args(["-C", "sub", "-f", "rules.mk"])
        .assert()
        .success();
    ensure!(work.exists("sub/stamp"), "action should run inside -C directory");
    Ok(())
}

#[test]
fn makefile_can_come_from_the_environment() -> Result<()> {
    let work = Workspace::new()?;
    work.write("other.mk", "stamp :\n\ttouch stamp\n")?;
    pmake()?
        .current_dir(work.root())
        .env("PMAKE_FILE", "other.mk")
        .assert()
        .success();
    ensure!(work.exists("stamp"), "stamp should be built");
    Ok(())
}

#[test]
fn dry_run_echoes_without_running() -> Result<()> {
    let work = Workspace::with_makefile(TOUCH_APP)?;
    pmake()?
        .current_dir(work.root())
        .arg("-n")
        .assert()
        .success()
        .stdout("touch app\n");
    ensure!(!work.exists("app"), "dry run must not create app");
    Ok(())
}

#[test]
fn print_renders_the_rules() -> Result<()> {
    let work = Workspace::with_makefile(
        "# objects\napp : main.o util.o\n\tcc  -o app main.o util.o\n\nclean :\n\trm -f app\n",
    )?;
    let output = pmake()?
        .current_dir(work.root())
        .args(["--print", "--dry-run", "clean"])
        .output()
        .context("run pmake --print")?;
    ensure!(output.status.success(), "print should succeed");
    let stdout = String::from_utf8(output.stdout).context("utf8 stdout")?;
    insta::assert_snapshot!(stdout, @r"
    app : main.o util.o
    	cc -o app main.o util.o
    clean :
    	rm -f app
    rm -f app
    ");
    Ok(())
}

#[test]
fn unknown_target_fails_without_running_anything() -> Result<()> {
    let work = Workspace::with_makefile(TOUCH_APP)?;
    pmake()?
        .current_dir(work.root())
        .arg("install")
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("unknown target `install`"))
        .stderr(predicate::str::contains("pmake failed"));
    ensure!(!work.exists("app"), "no action should run");
    Ok(())
}

#[cfg(unix)]
#[test]
fn failing_action_stops_the_build() -> Result<()> {
    let work = Workspace::with_makefile(
        "all : broken\n\ttouch all\nbroken :\n\t./fails\n\ttouch broken\n",
    )?;
    fake_program(work.root(), "fails", 3)?;
    pmake()?
        .current_dir(work.root())
        .assert()
        .failure()
        .stdout("./fails\n")
        .stderr(predicate::str::contains("building `broken` failed"));
    ensure!(!work.exists("broken"), "later actions must not run");
    ensure!(!work.exists("all"), "dependents must not run");
    Ok(())
}

#[test]
fn missing_program_is_reported() -> Result<()> {
    let work = Workspace::with_makefile("x :\n\tpmake-test-no-such-program\n")?;
    pmake()?
        .current_dir(work.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to launch"));
    Ok(())
}

#[test]
fn malformed_makefile_points_at_the_line() -> Result<()> {
    let work = Workspace::with_makefile("app : main.o\n    cc -o app main.o\n")?;
    pmake()?
        .current_dir(work.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Makefile:2:"));
    Ok(())
}

#[test]
fn missing_makefile_is_reported() -> Result<()> {
    let work = Workspace::new()?;
    pmake()?
        .current_dir(work.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read Makefile"));
    Ok(())
}

#[test]
fn cycle_is_reported() -> Result<()> {
    let work = Workspace::with_makefile("a : b\nb : a\n")?;
    pmake()?
        .current_dir(work.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("a -> b -> a"));
    Ok(())
}

#[test]
fn jobs_out_of_range_is_rejected() -> Result<()> {
    let work = Workspace::with_makefile(TOUCH_APP)?;
    pmake()?
        .current_dir(work.root())
        .args(["-p", "-j", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("jobs must be between 1 and 64"));
    Ok(())
}

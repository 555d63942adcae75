use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{
    PASSWORD, init, rpm_db, saved_workout_id, setup_test_db, signin, signup, temp_out, workout,
};

#[test]
fn test_init_signup_whoami() {
    let db_path = setup_test_db("cli_init_signup");
    init(&db_path);

    rpm_db(&db_path)
        .args(["signup", "--email", "Alice@Example.com", "--password", PASSWORD])
        .assert()
        .success()
        .stdout(contains("Signed in as alice@example.com"));

    rpm_db(&db_path)
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("alice@example.com"));

    rpm_db(&db_path)
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("signup").and(contains("init")));
}

#[test]
fn test_commands_require_sign_in() {
    let db_path = setup_test_db("cli_not_signed_in");
    init(&db_path);

    rpm_db(&db_path)
        .arg("feed")
        .assert()
        .failure()
        .stderr(contains("Not signed in"));

    signup(&db_path, "alice@example.com");
    rpm_db(&db_path).arg("signout").assert().success();
    rpm_db(&db_path).arg("history").assert().failure();
}

#[test]
fn test_wrong_password_fails() {
    let db_path = setup_test_db("cli_wrong_password");
    init(&db_path);
    signup(&db_path, "alice@example.com");

    rpm_db(&db_path)
        .args(["signin", "--email", "alice@example.com", "--password", "nope-nope"])
        .assert()
        .failure()
        .stderr(contains("Invalid email or password"));
}

#[test]
fn test_friends_add_list_remove() {
    let db_path = setup_test_db("cli_friends");
    init(&db_path);
    signup(&db_path, "bob@example.com");
    signup(&db_path, "alice@example.com");

    rpm_db(&db_path)
        .args(["friends", "--add", "bob@example.com"])
        .assert()
        .success()
        .stdout(contains("is now your friend"));

    rpm_db(&db_path)
        .arg("friends")
        .assert()
        .success()
        .stdout(contains("bob@example.com"));

    // symmetric: bob sees alice
    signin(&db_path, "bob@example.com");
    rpm_db(&db_path)
        .arg("friends")
        .assert()
        .success()
        .stdout(contains("alice@example.com"));

    rpm_db(&db_path)
        .args(["friends", "--remove", "alice@example.com"])
        .assert()
        .success()
        .stdout(contains("removed"));

    rpm_db(&db_path)
        .arg("friends")
        .assert()
        .success()
        .stdout(contains("No friends yet"));

    rpm_db(&db_path)
        .args(["friends", "--add", "bob@example.com"])
        .assert()
        .failure()
        .stderr(contains("yourself"));

    rpm_db(&db_path)
        .args(["friends", "--add", "ghost@example.com"])
        .assert()
        .failure()
        .stderr(contains("Not found"));
}

#[test]
fn test_workout_session_is_saved_with_coerced_sets() {
    let db_path = setup_test_db("cli_workout");
    init(&db_path);
    signup(&db_path, "alice@example.com");

    let out = workout(&db_path, "add squat\nset 1 135 5\nset 1 abc\nend\n");
    assert!(out.contains("Workout Complete!"));
    assert!(out.contains("2 x Squat"));

    rpm_db(&db_path)
        .arg("history")
        .assert()
        .success()
        .stdout(
            contains("Set 1: 135 lbs x 5 reps").and(contains("Set 2: 0 lbs x 0 reps")),
        );
}

#[test]
fn test_quit_then_resume_end() {
    let db_path = setup_test_db("cli_quit_resume");
    init(&db_path);
    signup(&db_path, "alice@example.com");

    let out = workout(&db_path, "add Deadlift\nset 1 315 1\nquit\n");
    assert!(out.contains("Workout kept for later"));

    rpm_db(&db_path)
        .arg("workout")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("unfinished workout"));

    rpm_db(&db_path)
        .args(["resume", "--end"])
        .assert()
        .success()
        .stdout(contains("Workout Complete!").and(contains("1 x Deadlift")));

    rpm_db(&db_path)
        .args(["resume"])
        .assert()
        .success()
        .stdout(contains("No unfinished workout"));
}

#[test]
fn test_signin_offers_to_end_an_abandoned_workout() {
    let db_path = setup_test_db("cli_signin_resume");
    init(&db_path);
    signup(&db_path, "alice@example.com");

    // end of input leaves the workout behind
    workout(&db_path, "add Squat\nset 1 225 3\n");

    rpm_db(&db_path)
        .args(["signin", "--email", "alice@example.com", "--password", PASSWORD])
        .write_stdin("e\n")
        .assert()
        .success()
        .stdout(contains("Unfinished workout").and(contains("1 x Squat")));

    rpm_db(&db_path)
        .arg("history")
        .assert()
        .success()
        .stdout(contains("Set 1: 225 lbs x 3 reps"));
}

#[test]
fn test_signin_resume_continues_the_workout() {
    let db_path = setup_test_db("cli_signin_continue");
    init(&db_path);
    signup(&db_path, "alice@example.com");
    workout(&db_path, "add Squat\nset 1 225 3\nquit\n");

    rpm_db(&db_path)
        .args(["signin", "--email", "alice@example.com", "--password", PASSWORD])
        .write_stdin("r\nset 1 235 2\nend\n")
        .assert()
        .success()
        .stdout(contains("2 x Squat"));
}

#[test]
fn test_feed_shows_friends_but_not_strangers() {
    let db_path = setup_test_db("cli_feed");
    init(&db_path);
    signup(&db_path, "bob@example.com");
    workout(&db_path, "add Bench Press\nset 1 185 5\nend\n");
    signup(&db_path, "carol@example.com");
    workout(&db_path, "add Pull-up\nset 1 0 12\nend\n");
    signup(&db_path, "alice@example.com");
    rpm_db(&db_path)
        .args(["friends", "--add", "bob@example.com"])
        .assert()
        .success();

    rpm_db(&db_path)
        .arg("feed")
        .assert()
        .success()
        .stdout(
            contains("bob@example.com")
                .and(contains("Bench Press"))
                .and(contains("carol@example.com").not())
                .and(contains("Pull-up").not()),
        );
}

#[test]
fn test_delete_own_workout() {
    let db_path = setup_test_db("cli_delete");
    init(&db_path);
    signup(&db_path, "bob@example.com");
    let bobs = saved_workout_id(&workout(&db_path, "add Squat\nset 1 100 5\nend\n"));
    signup(&db_path, "alice@example.com");
    let mine = saved_workout_id(&workout(&db_path, "add Deadlift\nset 1 200 5\nend\n"));

    rpm_db(&db_path)
        .args(["delete", &bobs, "--yes"])
        .assert()
        .failure()
        .stderr(contains("Not found"));

    rpm_db(&db_path)
        .args(["delete", &mine, "--yes"])
        .assert()
        .success()
        .stdout(contains("deleted"));

    rpm_db(&db_path)
        .arg("history")
        .assert()
        .success()
        .stdout(contains("No workouts yet"));

    signin(&db_path, "bob@example.com");
    rpm_db(&db_path)
        .arg("history")
        .assert()
        .success()
        .stdout(contains(bobs.as_str()));
}

#[test]
fn test_templates_and_workout_from_template() {
    let db_path = setup_test_db("cli_templates");
    init(&db_path);
    signup(&db_path, "alice@example.com");

    rpm_db(&db_path)
        .args(["template", "--add", "Push", "bench press", "Overhead Press"])
        .assert()
        .success()
        .stdout(contains("Template 'Push' saved"));

    rpm_db(&db_path)
        .args(["template", "--list"])
        .assert()
        .success()
        .stdout(contains("Bench Press, Overhead Press"));

    let out = workout_from_template(&db_path, "push", "set 2 95 8\nend\n");
    assert!(out.contains("0 x Bench Press"));
    assert!(out.contains("1 x Overhead Press"));
}

fn workout_from_template(db_path: &str, name: &str, lines: &str) -> String {
    let out = rpm_db(db_path)
        .args(["workout", "--template", name])
        .write_stdin(lines)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&out).to_string()
}

#[test]
fn test_custom_exercises_are_listed() {
    let db_path = setup_test_db("cli_exercises");
    init(&db_path);
    signup(&db_path, "alice@example.com");
    workout(&db_path, "add Cable Fly\nend\n");

    rpm_db(&db_path)
        .arg("exercises")
        .assert()
        .success()
        .stdout(contains("Squat").and(contains("Cable Fly")).and(contains("(custom)")));
}

#[test]
fn test_export_json_and_csv() {
    let db_path = setup_test_db("cli_export");
    init(&db_path);
    signup(&db_path, "alice@example.com");
    workout(&db_path, "add Squat\nset 1 135 5\nset 1 145 3\nend\n");

    let json_out = temp_out("cli_export", "json");
    rpm_db(&db_path)
        .args(["export", "--format", "json", "--file", &json_out, "--force"])
        .assert()
        .success();
    let json = fs::read_to_string(&json_out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
    assert_eq!(parsed[0]["exercises"][0]["sets"][1]["weight"], 145.0);

    let csv_out = temp_out("cli_export", "csv");
    rpm_db(&db_path)
        .args(["export", "--format", "csv", "--file", &csv_out, "--force"])
        .assert()
        .success()
        .stdout(contains("Exported 2 record(s)"));
    let csv = fs::read_to_string(&csv_out).unwrap();
    assert!(csv.starts_with("workout_id,performed_at,duration,exercise,set,weight,reps"));
    assert!(csv.contains(",Squat,2,145,3"));
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = setup_test_db("cli_export_relative");
    init(&db_path);
    signup(&db_path, "alice@example.com");

    rpm_db(&db_path)
        .args(["export", "--format", "csv", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_db_info_and_check() {
    let db_path = setup_test_db("cli_db_info");
    init(&db_path);

    rpm_db(&db_path)
        .args(["db", "--info", "--check", "--migrate"])
        .assert()
        .success()
        .stdout(
            contains("Users:")
                .and(contains("Integrity check passed"))
                .and(contains("up to date")),
        );
}

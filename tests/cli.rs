use assert_cmd::Command;

const EXAMPLE_QUERY: &str =
    "chart=histogram&field=body_mass_g&bins=18&species=gentoo,adelie&island=Dream&sex=female";

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("penguinview"));
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("penguinview 0.3.0\n");
}

// Decode subcommand tests

#[test]
fn decode_prints_state_and_canonical_query() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args(["decode", EXAMPLE_QUERY]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains(
            "chart:       histogram (field=body_mass_g, bins=18)",
        ))
        .stdout(predicates::str::contains("species:     Adelie,Gentoo"))
        .stdout(predicates::str::contains(
            "query:       chart=histogram&field=body_mass_g&bins=18&species=Adelie,Gentoo&island=Dream&sex=female",
        ));
}

#[test]
fn decode_accepts_full_url_and_leading_question_mark() {
    let mut from_url = Command::cargo_bin("penguinview").unwrap();
    from_url.args(["decode", "https://penguins.example/app?chart=box&field=bill_depth_mm#plot"]);
    from_url
        .assert()
        .success()
        .stdout(predicates::str::contains("chart:       box (field=bill_depth_mm)"));

    let mut from_query = Command::cargo_bin("penguinview").unwrap();
    from_query.args(["decode", "?chart=box&field=bill_depth_mm"]);
    from_query
        .assert()
        .success()
        .stdout(predicates::str::contains("query:       chart=box&field=bill_depth_mm"));
}

#[test]
fn decode_json_output_format() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args(["decode", EXAMPLE_QUERY, "--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"kind\": \"histogram\""))
        .stdout(predicates::str::contains("\"bins\": 18"));
}

#[test]
fn decode_respects_bin_limits() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args([
        "decode",
        "chart=histogram&bins=80",
        "--max-bins",
        "50",
        "--default-bins",
        "10",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("bins=50"));

    let mut fallback = Command::cargo_bin("penguinview").unwrap();
    fallback.args(["decode", "chart=histogram&bins=nope", "--default-bins", "10"]);
    fallback
        .assert()
        .success()
        .stdout(predicates::str::contains("bins=10"));
}

#[test]
fn bin_flags_reject_out_of_range_values() {
    for (flag, value) in [
        ("--max-bins", "0"),
        ("--max-bins", "4294967295"),
        ("--default-bins", "0"),
        ("--default-bins", "1001"),
    ] {
        let mut cmd = Command::cargo_bin("penguinview").unwrap();
        cmd.args(["decode", "chart=histogram", flag, value]);
        cmd.assert().failure();
    }
}

#[test]
fn raised_bin_limit_agrees_between_decode_and_share() {
    let mut decode = Command::cargo_bin("penguinview").unwrap();
    decode.args(["decode", "chart=histogram&bins=150", "--max-bins", "200"]);
    decode
        .assert()
        .success()
        .stdout(predicates::str::contains("bins=150"));

    let mut share = Command::cargo_bin("penguinview").unwrap();
    share.args([
        "share",
        "http://localhost/?chart=histogram&bins=150",
        "--max-bins",
        "200",
    ]);
    share
        .assert()
        .success()
        .stdout("http://localhost/?chart=histogram&field=bill_length_mm&bins=150\n");
}

#[test]
fn decode_never_fails_on_garbage_query() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args(["decode", "chart=pie&x=wingspan&years=banana&island=Atlantis"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("query:       chart=scatter\n"));
}

#[test]
fn decode_invalid_url_fails() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args(["decode", "http://[::1/?chart=box"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Invalid URL"));
}

// Share subcommand tests

#[test]
fn share_prints_canonical_url() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args([
        "share",
        "https://penguins.example/explore?sex=FEMALE&chart=scatter&species=chinstrap&x=bill_depth_mm#plot",
    ]);
    cmd.assert().success().stdout(
        "https://penguins.example/explore?chart=scatter&x=bill_depth_mm&species=Chinstrap&sex=female#plot\n",
    );
}

#[test]
fn share_requires_absolute_url() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args(["share", "chart=box"]);
    cmd.assert().failure();
}

// Summary subcommand tests

#[test]
fn summary_text_report() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args([
        "summary",
        "--data",
        "tests/fixtures/penguins_small.json",
        "--query",
        "chart=histogram&field=body_mass_g&bins=3&species=Gentoo,Chinstrap",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Penguin Data Summary"))
        .stdout(predicates::str::contains("Histogram: Body Mass G"))
        .stdout(predicates::str::contains("Unrecognized values"))
        .stdout(predicates::str::contains("plankton"));
}

#[test]
fn summary_json_output_format() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args([
        "summary",
        "--data",
        "tests/fixtures/penguins_small.json",
        "--query",
        "?chart=box&field=flipper_length_mm&island=Dream",
        "--output",
        "json",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"total_records\": 6"))
        .stdout(predicates::str::contains("\"filtered_records\": 3"))
        .stdout(predicates::str::contains("Macaroni"));
}

#[test]
fn summary_reads_csv_and_env_data_path() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.env("PENGUINVIEW_DATA", "tests/fixtures/penguins_small.csv");
    cmd.args(["summary", "--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"total_records\": 5"))
        .stdout(predicates::str::contains("\"filtered_records\": 5"));
}

#[test]
fn summary_explicit_format_overrides_extension() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("penguins.txt");
    std::fs::copy("tests/fixtures/penguins_small.csv", &path).expect("copy fixture");

    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.arg("summary")
        .arg("--data")
        .arg(&path)
        .args(["--format", "csv", "--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"total_records\": 5"));
}

#[test]
fn summary_unsupported_format_fails() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args([
        "summary",
        "--data",
        "tests/fixtures/penguins_small.json",
        "--format",
        "parquet",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported format"));
}

#[test]
fn summary_missing_file_fails() {
    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.args(["summary", "--data", "tests/fixtures/does_not_exist.json"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("error:"));
}

#[test]
fn summary_malformed_json_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("broken.json");
    std::fs::write(&path, "{ not an array").expect("write fixture");

    let mut cmd = Command::cargo_bin("penguinview").unwrap();
    cmd.arg("summary").arg("--data").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to parse dataset JSON"));
}

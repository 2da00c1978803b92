mod common;

use common::{read_array, read_lines, scenario_record, strong_record, TestEnv};
use serde_json::{json, Value};
use std::fs;

fn submit(env: &TestEnv, round: &str, records: &[Value]) -> Value {
    let input = env.write_input(&format!("{}.json", round), records);
    env.run_json(&[
        "submit",
        "--input",
        input.to_str().unwrap(),
        "--round",
        round,
    ])
}

#[test]
fn submit_validate_finalize_merge() {
    let env = TestEnv::new();
    let records: Vec<Value> = (1..=4).map(|i| strong_record(&format!("s{}", i))).collect();

    let sub = submit(&env, "r1", &records);
    assert_eq!(sub["ok"], true);
    assert_eq!(sub["data"]["validated"], 4);
    assert_eq!(sub["data"]["errors"], json!([]));

    let pretty = read_array(&env.pretty_path("r1"));
    let clean = read_lines(&env.clean_path("r1"));
    assert_eq!(pretty, clean);
    assert_eq!(pretty[0]["pratijna"], "The word rāmaḥ is in the nominative");
    assert_eq!(read_lines(&env.staging_path()).len(), 4);

    let v = env.run_json(&["validate", "--round", "r1"]);
    assert_eq!(v["data"]["passes"], true);
    assert_eq!(v["data"]["non_western_share"], 1.0);
    assert!(env.round_dir("r1").join("validation_result.json").exists());

    let fin = env.run_json(&["finalize", "--round", "r1", "--merge"]);
    assert_eq!(fin["data"]["snapshot_count"], 4);
    assert_eq!(fin["data"]["merged_into_clean"], 4);
    assert_eq!(fin["data"]["forced"], false);
    let snapshot = fin["data"]["approved_snapshot"].as_str().unwrap();
    assert_eq!(read_lines(std::path::Path::new(snapshot)), clean);

    let again = env.run_json(&["finalize", "--round", "r1", "--merge"]);
    assert_eq!(again["data"]["merged_into_clean"], 0);
    assert_eq!(again["data"]["skipped_existing"], 4);
    assert_eq!(read_lines(&env.corpus_path()), clean);

    let audit = fs::read_to_string(env.root.join("audit.jsonl")).unwrap();
    assert!(audit.contains("\"action\":\"finalize\""));
}

#[test]
fn single_untagged_record_fails_diversity_and_blocks_finalize() {
    let env = TestEnv::new();
    submit(&env, "r1", &[scenario_record()]);

    let v = env.run_json(&["validate", "--round", "r1"]);
    assert_eq!(v["data"]["total"], 1);
    assert_eq!(v["data"]["schema_ok"], true);
    assert_eq!(v["data"]["non_western_share"], 0.0);
    assert_eq!(v["data"]["passes"], false);

    let (code, body) = env.run_fail(&["finalize", "--round", "r1"]);
    assert_eq!(code, 3);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["kind"], "validation_failed");
    assert!(!env.root.join("Datasets/approved").exists());

    let forced = env.run_json(&["finalize", "--round", "r1", "--force", "--output", "x.jsonl"]);
    assert_eq!(forced["data"]["forced"], true);
    let snap = read_lines(&env.root.join("Datasets/approved/x.jsonl"));
    assert_eq!(snap, read_lines(&env.clean_path("r1")));
}

#[test]
fn enrich_tags_untagged_records_so_the_round_passes() {
    let env = TestEnv::new();
    submit(&env, "r1", &[scenario_record()]);

    let e = env.run_json(&["enrich", "--round", "r1", "--tag-non-western"]);
    assert_eq!(e["data"]["changed"], 1);
    assert_eq!(read_array(&env.pretty_path("r1")), read_lines(&env.clean_path("r1")));

    let v = env.run_json(&["validate", "--round", "r1"]);
    assert_eq!(v["data"]["non_western_share"], 1.0);
    assert_eq!(v["data"]["passes"], true);
}

#[test]
fn invalid_records_are_reported_and_skipped() {
    let env = TestEnv::new();
    let mut broken = strong_record("b1");
    broken.as_object_mut().unwrap().remove("hetu");
    broken["nigamana"] = json!("   ");

    let sub = submit(&env, "r1", &[strong_record("a1"), broken]);
    assert_eq!(sub["data"]["input_items"], 2);
    assert_eq!(sub["data"]["validated"], 1);
    assert_eq!(sub["data"]["errors"][0]["index"], 1);
    assert_eq!(sub["data"]["errors"][0]["missing"], json!(["hetu", "nigamana"]));
    assert_eq!(read_lines(&env.clean_path("r1")).len(), 1);
}

#[test]
fn submit_reads_jsonl_from_stdin_and_mints_ids() {
    let env = TestEnv::new();
    let payload = format!("{}\n\n{}\n", scenario_record(), scenario_record());
    let sub = env.run_json_stdin(&["submit"], &payload);
    assert_eq!(sub["data"]["round"], "staging_round_0001");
    assert_eq!(sub["data"]["validated"], 2);

    let lines = read_lines(&env.clean_path("staging_round_0001"));
    let ids: Vec<&str> = lines.iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(!ids[0].is_empty());
}

#[test]
fn dry_run_leaves_the_root_untouched() {
    let env = TestEnv::new();
    let input = env.write_input("in.json", &[strong_record("a")]);
    let out = env.run_json(&["submit", "--input", input.to_str().unwrap(), "--dry-run"]);
    assert_eq!(out["data"]["dry_run"], true);
    assert_eq!(out["data"]["validated"], 1);
    assert!(!env.staging_path().exists());
    assert!(!env.root.join("Datasets").exists());
}

#[test]
fn error_exit_codes() {
    let env = TestEnv::new();

    let (code, body) = env.run_fail(&["validate", "--round", "ghost"]);
    assert_eq!(code, 6);
    assert_eq!(body["error"]["kind"], "round_not_found");

    let (code, _) = env.run_fail(&["finalize", "--round", "ghost"]);
    assert_eq!(code, 6);

    fs::create_dir_all(env.round_dir("empty")).unwrap();
    fs::write(env.clean_path("empty"), "").unwrap();
    let (code, body) = env.run_fail(&["finalize", "--round", "empty"]);
    assert_eq!(code, 5);
    assert_eq!(body["error"]["kind"], "empty_round");

    submit(&env, "r1", &[strong_record("a")]);
    fs::write(env.round_dir("r1").join("validation_result.json"), "{oops").unwrap();
    let (code, body) = env.run_fail(&["finalize", "--round", "r1"]);
    assert_eq!(code, 4);
    assert_eq!(body["error"]["kind"], "malformed_verdict");

    env.cmd().arg("label").assert().code(2);
}

#[test]
fn corrupt_corpus_fails_merge_without_a_snapshot() {
    let env = TestEnv::new();
    submit(&env, "r1", &[strong_record("a")]);
    fs::write(env.corpus_path(), "{broken\n").unwrap();

    let (code, body) = env.run_fail(&["finalize", "--round", "r1", "--merge", "--force"]);
    assert_eq!(code, 1);
    assert_eq!(body["error"]["kind"], "malformed_line");
    assert!(!env.root.join("Datasets/approved").exists());
    assert_eq!(fs::read_to_string(env.corpus_path()).unwrap(), "{broken\n");
}

#[test]
fn require_verdict_from_config_file() {
    let env = TestEnv::new();
    fs::write(env.root.join("curate.toml"), "require_verdict = true\n").unwrap();
    submit(&env, "r1", &[strong_record("a")]);

    let (code, body) = env.run_fail(&["finalize", "--round", "r1"]);
    assert_eq!(code, 8);
    assert_eq!(body["error"]["kind"], "missing_verdict");
}

#[test]
fn threshold_overrides_apply_to_the_verdict() {
    let env = TestEnv::new();
    submit(&env, "r1", &[scenario_record()]);
    let out = env.round_dir("r1").join("custom.json");
    let v = env.run_json(&[
        "validate",
        "--round",
        "r1",
        "--non-western-threshold",
        "0",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert_eq!(v["data"]["thresholds"]["non_western_share"], 0.0);
    assert_eq!(v["data"]["passes"], true);
    assert!(out.exists());
    assert!(!env.round_dir("r1").join("validation_result.json").exists());

    let output = env
        .cmd()
        .args(["validate", "--round", "r1", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("finalize will not see it"), "{}", stderr);

    let quiet = env
        .cmd()
        .args(["validate", "--round", "r1"])
        .assert()
        .success()
        .get_output()
        .clone();
    assert!(!String::from_utf8(quiet.stderr).unwrap().contains("finalize will not see it"));
}

#[test]
fn convert_sync_and_map_index() {
    let env = TestEnv::new();
    let records: Vec<Value> = (1..=3).map(|i| strong_record(&format!("m{}", i))).collect();
    submit(&env, "r1", &records);
    let pretty = env.pretty_path("r1");
    let clean = env.clean_path("r1");

    let m = env.run_json(&[
        "convert",
        "map-index",
        "--pretty",
        pretty.to_str().unwrap(),
        "--clean",
        clean.to_str().unwrap(),
        "--index",
        "3",
    ]);
    assert_eq!(m["data"]["mapped_clean_line"], 3);
    assert_eq!(m["data"]["ids_match"], true);

    let (code, body) = env.run_fail(&[
        "convert",
        "map-index",
        "--pretty",
        pretty.to_str().unwrap(),
        "--clean",
        clean.to_str().unwrap(),
        "--index",
        "3",
        "--base",
        "zero",
    ]);
    assert_eq!(code, 7);
    assert_eq!(body["error"]["kind"], "index_out_of_range");

    let out = env.round_dir("r1").join("copy.json");
    let c = env.run_json(&[
        "convert",
        "to-pretty",
        "--input",
        clean.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);
    assert_eq!(c["data"]["records"], 3);
    assert_eq!(read_array(&out), read_lines(&clean));

    fs::write(&clean, "").unwrap();
    let s = env.run_json(&["sync", "--round", "r1", "--from", "pretty"]);
    assert_eq!(s["data"]["records"], 3);
    assert_eq!(read_lines(&clean), read_array(&pretty));
}

#[test]
fn label_then_status_then_integrate() {
    let env = TestEnv::new();
    submit(&env, "r1", &[scenario_record()]);

    let before = env.run_json(&["status"]);
    assert_eq!(before["data"]["total"], 1);
    assert_eq!(before["data"]["unclassified"], 1);
    assert_eq!(before["data"]["unbatched"], 1);

    let l = env.run_json(&["label", "--staging"]);
    assert_eq!(l["data"]["classified"], 1);
    assert_eq!(l["data"]["distribution"]["Non-Western"], 1);

    let after = env.run_json(&["status"]);
    assert_eq!(after["data"]["unclassified"], 0);
    assert_eq!(after["data"]["unbatched"], 0);

    let mut strong = strong_record("p1");
    strong["batch_id"] = json!("sanskrit_grammar_test");
    let mut weak = scenario_record();
    weak["batch_id"] = json!("sanskrit_grammar_test");
    submit(&env, "r2", &[strong, weak]);

    let i = env.run_json(&["integrate", "--batch", "sanskrit_grammar_test"]);
    assert_eq!(i["data"]["processed"], 2);
    assert_eq!(i["data"]["approved"], 1);
    assert_eq!(i["data"]["previous_size"], 0);
    assert_eq!(i["data"]["final_size"], 1);

    let corpus = read_lines(&env.corpus_path());
    assert_eq!(corpus[0]["id"], "p1");
    assert_eq!(corpus[0]["staging_status"], "approved");
    assert_eq!(corpus[0]["staging_round"], 2);

    let again = env.run_json(&["integrate", "--batch", "sanskrit_grammar_test"]);
    assert_eq!(again["data"]["skipped_existing"], 1);
    assert_eq!(again["data"]["final_size"], 1);
    assert_eq!(again["data"]["backup"], Value::Null);
}

#[test]
fn text_format_prints_rows() {
    let env = TestEnv::new();
    submit(&env, "r1", &[strong_record("a")]);
    let out = env
        .cmd()
        .args(["--format", "text", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("total 1\t"));
}

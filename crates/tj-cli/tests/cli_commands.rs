//! Integration tests for the tj CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tj() -> Command {
    let mut cmd = Command::cargo_bin("tj").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write_config(text: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tianji.toml"), text).unwrap();
    dir
}

// ---------------------------------------------------------------------------
// calendar
// ---------------------------------------------------------------------------

#[test]
fn calendar_shows_pillars() {
    tj().args(["calendar", "--at", "2000-01-01T00:30:00+08:00"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("己卯年 丙子月 戊午日 壬子时")
                .and(predicate::str::contains("农历冬月廿五"))
                .and(predicate::str::contains("冬至")),
        );
}

#[test]
fn calendar_json() {
    tj().args(["calendar", "--json", "--at", "2024-02-10T09:00:00+08:00"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"year\": \"甲辰\"")
                .and(predicate::str::contains("\"hour\": \"己巳\""))
                .and(predicate::str::contains("\"lunar_day\": 1")),
        );
}

#[test]
fn calendar_year_turns_at_start_of_spring() {
    tj().args(["calendar", "--at", "2024-02-04T15:00:00+08:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("癸卯年"));
    tj().args(["calendar", "--at", "2024-02-04T18:00:00+08:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("甲辰年"));
}

#[test]
fn calendar_city_shifts_solar_time() {
    // Urumqi is 129.52 minutes of solar time behind the 120°E meridian.
    tj().args([
        "calendar",
        "--at",
        "2024-02-10T12:00:00+08:00",
        "--city",
        "Urumqi",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("Solar time:")
            .and(predicate::str::contains("09:50:28"))
            .and(predicate::str::contains("己巳时")),
    );
}

#[test]
fn calendar_negative_longitude() {
    tj().args([
        "calendar",
        "--json",
        "--at",
        "2024-06-01T12:00:00+08:00",
        "--longitude",
        "-9.14",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"longitude\": -9.14"));
}

#[test]
fn calendar_unknown_city_fails() {
    tj().args(["calendar", "--city", "Atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown city"));
}

#[test]
fn calendar_bad_timestamp_fails() {
    tj().args(["calendar", "--at", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timestamp"));
}

#[test]
fn calendar_out_of_range_fails() {
    tj().args(["calendar", "--at", "1850-01-01T00:00:00+08:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("calendar unavailable"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_switches_year_boundary() {
    let dir = write_config("year_boundary = \"lunar-new-year\"\n");
    let path = dir.path().join("tianji.toml");
    tj().args(["calendar", "--at", "2024-02-06T12:00:00+08:00", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("癸卯年 丙寅月"));
    tj().args(["calendar", "--at", "2024-02-06T12:00:00+08:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("甲辰年 丙寅月"));
}

#[test]
fn config_city_table() {
    let dir = write_config(
        r#"
[[cities]]
name = "Lisbon"
longitude = -9.14
"#,
    );
    tj().arg("cities")
        .arg("--config")
        .arg(dir.path().join("tianji.toml"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Lisbon")
                .and(predicate::str::contains("1 cities"))
                .and(predicate::str::contains("北京").not()),
        );
}

#[test]
fn config_city_drives_solar_time() {
    let dir = write_config(
        r#"
[[cities]]
name = "Lisbon"
longitude = -9.14
"#,
    );
    // (-9.14 - 120) * 4 = -516.56 min.
    tj().args([
        "calendar",
        "--at",
        "2024-06-01T12:00:00+08:00",
        "--city",
        "Lisbon",
        "--config",
    ])
    .arg(dir.path().join("tianji.toml"))
    .assert()
    .success()
    .stdout(
        predicate::str::contains("03:23:26")
            .and(predicate::str::contains("(-9.14°)")),
    );
}

#[test]
fn config_invalid_fails() {
    let dir = write_config("zi_hour = \"noon\"\n");
    tj().arg("calendar")
        .arg("--config")
        .arg(dir.path().join("tianji.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid calendar config"));
}

#[test]
fn config_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    tj().arg("calendar")
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config"));
}

// ---------------------------------------------------------------------------
// coin
// ---------------------------------------------------------------------------

#[test]
fn coin_is_reproducible_with_seed() {
    let args = ["coin", "--seed", "7", "--at", "2024-05-01T10:00:00+08:00"];
    let first = tj().args(args).assert().success().get_output().stdout.clone();
    let second = tj().args(args).assert().success().get_output().stdout.clone();
    assert_eq!(first, second);
    assert!(String::from_utf8(first).unwrap().contains("本卦"));
}

#[test]
fn coin_json() {
    tj().args(["coin", "--json", "--seed", "1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"hexagram\"")
                .and(predicate::str::contains("\"lines\""))
                .and(predicate::str::contains("\"moving_lines\"")),
        );
}

// ---------------------------------------------------------------------------
// meihua
// ---------------------------------------------------------------------------

#[test]
fn meihua_multiples_of_eight() {
    tj().args([
        "meihua",
        "8",
        "16",
        "--json",
        "--at",
        "2024-05-01T00:30:00+08:00",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("\"upper\": \"Kun\"")
            .and(predicate::str::contains("\"lower\": \"Kun\""))
            // 8 + 16 + 1 (子) = 25 → line 1.
            .and(predicate::str::contains("\"moving_line\": 1")),
    );
}

#[test]
fn meihua_zero_is_replaced() {
    tj().args(["meihua", "0", "5", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Body/use:"));
}

#[test]
fn meihua_text() {
    tj().args(["meihua", "3", "4", "--at", "2024-05-01T09:00:00+08:00"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("本 Main")
                .and(predicate::str::contains("火雷噬嗑"))
                .and(predicate::str::contains("Numbers:")),
        );
}

// ---------------------------------------------------------------------------
// oracle
// ---------------------------------------------------------------------------

#[test]
fn oracle_numeric_mode() {
    tj().args(["oracle", "1", "1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("大安 → 大安 → 大安"));
}

#[test]
fn oracle_time_mode_on_new_year() {
    // Lunar 1/1, 子 hour.
    tj().args(["oracle", "--at", "2024-02-10T00:30:00+08:00"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("农历正月初一")
                .and(predicate::str::contains("大安 → 大安 → 大安")),
        );
}

#[test]
fn oracle_wrong_count_fails() {
    tj().args(["oracle", "1", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zero or three numbers"));
}

#[test]
fn oracle_zero_fails() {
    tj().args(["oracle", "0", "2", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input"));
}

// ---------------------------------------------------------------------------
// prompt
// ---------------------------------------------------------------------------

#[test]
fn prompt_meihua() {
    tj().args([
        "prompt",
        "meihua",
        "问事业",
        "--seed",
        "5",
        "--city",
        "北京",
        "--gender",
        "女",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("【梅花要点】")
            .and(predicate::str::contains("- 性别：女"))
            .and(predicate::str::contains("- 经度：116.40°"))
            .and(predicate::str::contains("问题：问事业")),
    );
}

#[test]
fn prompt_accepts_chinese_method_name() {
    tj().args(["prompt", "大六壬", "何时搬家", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"method\": \"liuren\"")
                .and(predicate::str::contains("月将")),
        );
}

#[test]
fn prompt_meihua_uses_given_numbers() {
    tj().args([
        "prompt",
        "meihua",
        "问事业",
        "--numbers",
        "3",
        "4",
        "--at",
        "2024-05-01T09:00:00+08:00",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("上卦：离火")
            .and(predicate::str::contains("下卦：震雷"))
            .and(predicate::str::contains("本卦：火雷噬嗑"))
            // 3 + 4 + 6 (巳) = 13 → line 1.
            .and(predicate::str::contains("动爻：1")),
    );
}

#[test]
fn prompt_numbers_only_for_meihua() {
    tj().args(["prompt", "liuyao", "问事业", "--numbers", "3", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only applies to meihua"));
}

#[test]
fn prompt_carries_birth_chart() {
    tj().args([
        "prompt",
        "liuren",
        "问姻缘",
        "--pillars",
        "庚午,戊寅,甲子,丙寅",
        "--birth-year",
        "1990",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "- 八字/年命：年柱庚午 月柱戊寅 日柱甲子 时柱丙寅",
    ));
}

#[test]
fn prompt_bad_birth_chart_fails() {
    tj().args(["prompt", "liuren", "问姻缘", "--pillars", "庚午,戊寅,甲丑,丙寅"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input").and(predicate::str::contains("甲丑")));
}

#[test]
fn prompt_unknown_method_fails() {
    tj().args(["prompt", "tarot", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown method"));
}

#[test]
fn prompt_empty_question_fails() {
    tj().args(["prompt", "xiaoliuren", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question must not be empty"));
}

// ---------------------------------------------------------------------------
// cities
// ---------------------------------------------------------------------------

#[test]
fn cities_lists_builtin_table() {
    tj().arg("cities")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("乌鲁木齐")
                .and(predicate::str::contains("Urumqi"))
                .and(predicate::str::contains("35 cities")),
        );
}

#[test]
fn cities_json() {
    tj().args(["cities", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"上海\""));
}

#[test]
fn verbose_logs_to_stderr() {
    tj().args(["calendar", "-v", "--at", "2024-02-10T09:00:00+08:00"])
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved"));
}

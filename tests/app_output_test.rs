mod common;

use stmtload::{
    app::{
        approot::{run_stmtload_app_to_writer, AppRunSummary, Options, OutputFormat},
        outfmt::{json::JsonWriter, model::EntryWriter, text::TextWriter},
    },
    statement::{registry::global, Institution},
    testlib::assert_re,
    util::{date::pub_testlib::ymd, rw::WriteHandle},
};

use common::{fixtures_dir, NonAutoCreatingTestDir};

fn options(dir: std::path::PathBuf, institutions: Vec<Institution>, format: OutputFormat) -> Options {
    Options { dir, date: ymd(2020, 8, 15), institutions, format, fail_fast: false }
}

#[test]
fn test_text_output() {
    let (out_h, out_buff) = WriteHandle::string_buff_write_handle();
    let (err_h, err_buff) = WriteHandle::string_buff_write_handle();
    let mut writer = TextWriter::new(out_h);

    let summary = run_stmtload_app_to_writer(
        &mut writer,
        global(),
        &options(fixtures_dir(), vec![Institution::Td], OutputFormat::Text),
        err_h,
    )
    .unwrap();
    assert_eq!(summary, AppRunSummary { entries: 1, failed_files: 0 });
    assert_eq!(err_buff.borrow().as_str(), "");

    let out = out_buff.borrow().as_str().to_string();
    assert!(out.starts_with("TD account TD01 Direct Investing (TD_Holdings_TD01_20200815.csv)\n"));
    assert_re(r"\| XIU +\| ISHARES S&P/TSX 60 INDEX ETF +\| 100 ", &out);
    assert_re(r"\| CAD +\| 96\.00 +\| 4904\.00 +\| 5000\.00 +\|", &out);
    assert!(out.contains("1 row(s) ignored"));
}

#[test]
fn test_json_output() {
    let (out_h, out_buff) = WriteHandle::string_buff_write_handle();
    let (err_h, _) = WriteHandle::string_buff_write_handle();
    let mut writer = Box::new(JsonWriter::new(out_h, true));

    let summary = run_stmtload_app_to_writer(
        writer.as_mut(),
        global(),
        &options(fixtures_dir(), vec![Institution::Rbc, Institution::Td], OutputFormat::Json),
        err_h,
    )
    .unwrap();
    assert_eq!(summary.entries, 5);
    writer.finish().unwrap();

    let out: serde_json::Value = serde_json::from_str(out_buff.borrow().as_str()).unwrap();
    let accounts: Vec<&str> = out
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["accountNum"].as_str().unwrap())
        .collect();
    assert_eq!(accounts, vec!["RBC01", "RBC02", "RBC03", "RBC04", "TD01"]);
    assert_eq!(out[0]["usrate"], "1.3259");
    assert_eq!(out[0]["cash"], serde_json::json!({"CAD": "68.45", "USD": "85.90"}));
    assert_eq!(out[4]["usrate"], "0");
}

#[test]
fn test_failed_files() {
    let dir = NonAutoCreatingTestDir::new().create();
    dir.copy_fixture("TD_Holdings_TD01_20200815.csv");
    dir.write_file("TD_Holdings_TD02_20200815.csv", "Account Number,TD02\nMargin,CAD,1.00\n");

    // Reported, but the good statement is still printed
    let (out_h, out_buff) = WriteHandle::string_buff_write_handle();
    let (err_h, err_buff) = WriteHandle::string_buff_write_handle();
    let mut writer = TextWriter::new(out_h);
    let summary = run_stmtload_app_to_writer(
        &mut writer,
        global(),
        &options(dir.path.clone(), vec![Institution::Td], OutputFormat::Text),
        err_h,
    )
    .unwrap();
    assert_eq!(summary, AppRunSummary { entries: 1, failed_files: 1 });
    assert!(out_buff.borrow().as_str().contains("TD account TD01"));
    assert_re(
        r#"^\[!\] .*TD_Holdings_TD02_20200815\.csv: unsupported statement format: Row 2: Unrecognized line "Margin"\n$"#,
        err_buff.borrow().as_str(),
    );

    // With fail_fast, nothing is printed
    let (out_h, out_buff) = WriteHandle::string_buff_write_handle();
    let (err_h, _) = WriteHandle::string_buff_write_handle();
    let mut writer = TextWriter::new(out_h);
    let mut opts = options(dir.path.clone(), vec![Institution::Td], OutputFormat::Text);
    opts.fail_fast = true;
    let res = run_stmtload_app_to_writer(&mut writer, global(), &opts, err_h);
    assert_eq!(res, Err(()));
    assert_eq!(out_buff.borrow().as_str(), "");
}

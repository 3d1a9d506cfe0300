use crate::select_core::cli::ListFormat;
use crate::select_core::config::{Config, TransferOptions, Verbosity};
use crate::select_core::convert::Converter;
use crate::select_core::database::Database;
use crate::select_core::error::Result;
use crate::select_core::materialize::{MaterializeReport, Materializer};
use crate::select_core::prompt::Prompt;
use crate::select_core::record::{FileRecord, RecordListing};
use crate::select_core::selector::select;
use crate::select_core::sync::{check_sync_target, reconcile};
use std::io::Write;

/// Open the database, run the selection and close the database again.
pub fn select_records(config: &Config) -> Result<Vec<FileRecord>> {
    log::debug!("Reading {}", config.input.display());
    let db = Database::open(&config.input)?;
    select(&db, &config.selection)
}

/// Print the selection instead of transferring it.
pub fn list_records(records: &[FileRecord], format: ListFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        ListFormat::Paths => {
            for record in records {
                writeln!(out, "{}", record.source_path().display())?;
            }
        }
        ListFormat::Json => {
            let listing: Vec<RecordListing> = records.iter().map(RecordListing::from).collect();
            serde_json::to_writer_pretty(&mut *out, &listing).map_err(std::io::Error::from)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Materialize the selection, then run the sync pass if requested.
pub fn transfer_records(
    records: &[FileRecord],
    opts: &TransferOptions,
    verbosity: Verbosity,
    converter: &dyn Converter,
    prompt: &mut dyn Prompt,
) -> Result<MaterializeReport> {
    if opts.sync {
        check_sync_target(records, opts)?;
    }

    log::info!(
        "{}{} {} images -> {}",
        if opts.dry_run { "[DRY RUN] " } else { "" },
        opts.mode,
        records.len(),
        opts.output.display()
    );

    let mut report = Materializer::new(opts, verbosity, converter, prompt).run(records);
    if opts.sync {
        report.removed = reconcile(opts, records, prompt);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select_core::cli::TransferMode;
    use crate::select_core::config::Action;
    use crate::select_core::convert::ImageMagick;
    use crate::select_core::error::SelectError;
    use crate::select_core::selector::SelectionQuery;
    use crate::select_core::selector::tests::create_fixture_db;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    struct Yes;

    impl Prompt for Yes {
        fn confirm(&mut self, _message: &str) -> Result<bool> {
            Ok(true)
        }
    }

    fn config(temp: &TempDir, selection: SelectionQuery) -> Config {
        let db = temp.child("digikam4.db");
        create_fixture_db(db.path(), temp.child("photos").path());
        Config {
            input: db.path().to_path_buf(),
            selection,
            action: Action::List(ListFormat::Paths),
            verbosity: Verbosity::Normal,
        }
    }

    #[test]
    fn test_select_records_from_fixture() {
        let temp = TempDir::new().unwrap();
        let config = config(
            &temp,
            SelectionQuery {
                tags: vec!["vacation".to_string()],
                min_rating: 3,
                ..Default::default()
            },
        );
        let records = select_records(&config).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["beach.jpg", "sunset.JPG"]);
    }

    #[test]
    fn test_select_records_on_foreign_database_fails() {
        let temp = TempDir::new().unwrap();
        let db = temp.child("empty.db");
        rusqlite::Connection::open(db.path())
            .unwrap()
            .execute_batch("CREATE TABLE t (x INTEGER);")
            .unwrap();
        let config = Config {
            input: db.path().to_path_buf(),
            selection: SelectionQuery::default(),
            action: Action::List(ListFormat::Paths),
            verbosity: Verbosity::Normal,
        };
        assert!(matches!(
            select_records(&config),
            Err(SelectError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_list_paths_and_json() {
        let records = vec![
            FileRecord::new("/a", "/b", "one.jpg"),
            FileRecord::new("/a", "/c", "two.jpg"),
        ];

        let mut out = Vec::new();
        list_records(&records, ListFormat::Paths, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/a/b/one.jpg\n/a/c/two.jpg\n");

        let mut out = Vec::new();
        list_records(&records, ListFormat::Json, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["name"], "two.jpg");
        assert_eq!(json[1]["source"], "/a/c/two.jpg");
    }

    #[test]
    fn test_sync_into_collection_fails_before_writing() {
        let temp = TempDir::new().unwrap();
        temp.child("photos/2017/Holiday/beach.jpg").write_str("beach").unwrap();
        temp.child("photos/2018/Work/meeting.png").write_str("meeting").unwrap();
        let records = vec![FileRecord::new(
            temp.child("photos").path(),
            "/2017/Holiday",
            "beach.jpg",
        )];
        let mut opts = TransferOptions::new(temp.child("photos").path(), TransferMode::Copy);
        opts.sync = true;
        opts.force = true;

        let result = transfer_records(
            &records,
            &opts,
            Verbosity::Normal,
            &ImageMagick::with_binary("convert"),
            &mut Yes,
        );

        assert!(matches!(result, Err(SelectError::Configuration(_))));
        temp.child("photos/2017/Holiday/beach.jpg").assert("beach");
        temp.child("photos/2018/Work/meeting.png").assert("meeting");
    }

    #[test]
    fn test_transfer_with_sync() {
        let temp = TempDir::new().unwrap();
        temp.child("photos/2017/Holiday/beach.jpg").write_str("beach").unwrap();
        temp.child("out/2017/Holiday/old.jpg").write_str("old").unwrap();
        let records = vec![FileRecord::new(
            temp.child("photos").path(),
            "/2017/Holiday",
            "beach.jpg",
        )];
        let mut opts = TransferOptions::new(temp.child("out").path(), TransferMode::Copy);
        opts.sync = true;

        let report = transfer_records(
            &records,
            &opts,
            Verbosity::Normal,
            &ImageMagick::with_binary("convert"),
            &mut Yes,
        )
        .unwrap();

        assert_eq!(report.materialized, 1);
        assert_eq!(report.removed, 1);
        temp.child("out/2017/Holiday/beach.jpg").assert("beach");
        temp.child("out/2017/Holiday/old.jpg")
            .assert(predicates::path::missing());
    }
}

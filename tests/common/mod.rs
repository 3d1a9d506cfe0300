use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use rusqlite::Connection;

const DIGIKAM_SCHEMA: &str = include_str!("../fixtures/digikam_schema.sql");

/// A digiKam collection on disk: `photos/` with its database, and an empty `out/`.
pub struct Collection {
    pub db: ChildPath,
    pub photos: ChildPath,
    pub out: ChildPath,
}

/// Images (album, name, rating, tags):
///   /2017/Holiday beach.jpg  5 vacation,family
///   /2017/Holiday sunset.JPG 3 vacation
///   /2018/Work    meeting.png 1 work
///   /2018/Work    unrated.jpg -1
pub fn setup_collection(temp: &TempDir) -> Collection {
    let photos = temp.child("photos");
    photos.child("2017/Holiday/beach.jpg").write_str("beach").unwrap();
    photos.child("2017/Holiday/sunset.JPG").write_str("sunset").unwrap();
    photos.child("2018/Work/meeting.png").write_str("meeting").unwrap();
    photos.child("2018/Work/unrated.jpg").write_str("unrated").unwrap();

    let out = temp.child("out");
    out.create_dir_all().unwrap();

    let db = temp.child("digikam4.db");
    let conn = Connection::open(db.path()).unwrap();
    conn.execute_batch(DIGIKAM_SCHEMA).unwrap();
    conn.execute(
        "INSERT INTO AlbumRoots (id, label, specificPath) VALUES (1, 'Pictures', ?1)",
        [photos.path().to_string_lossy()],
    )
    .unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO Albums (id, albumRoot, relativePath) VALUES (1, 1, '/2017/Holiday'), (2, 1, '/2018/Work');
        INSERT INTO Images (id, album, name) VALUES
            (1, 1, 'beach.jpg'), (2, 1, 'sunset.JPG'), (3, 2, 'meeting.png'), (4, 2, 'unrated.jpg');
        INSERT INTO ImageInformation (imageid, rating) VALUES (1, 5), (2, 3), (3, 1), (4, -1);
        INSERT INTO Tags (id, pid, name) VALUES (1, 0, 'vacation'), (2, 0, 'family'), (3, 0, 'work');
        INSERT INTO ImageTags (imageid, tagid) VALUES (1, 1), (1, 2), (2, 1), (3, 3);
        "#,
    )
    .unwrap();

    Collection { db, photos, out }
}

/// `digikam-select -i <db> -o <out>` ready for more arguments.
pub fn select_cmd(collection: &Collection) -> Command {
    let mut cmd = Command::cargo_bin("digikam-select").unwrap();
    cmd.arg("-i")
        .arg(collection.db.path())
        .arg("-o")
        .arg(collection.out.path());
    cmd
}

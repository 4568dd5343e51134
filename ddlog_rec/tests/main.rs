use aok::{OK, Void};
use ddlog_rec::{Col, DdlRecord, Error, Kind, LogType, RecordBuilder, Row};
use log::info;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn samples() -> Vec<DdlRecord> {
  vec![
    DdlRecord::new(
      1,
      10,
      Kind::FreeTree {
        space_id: 5,
        page_no: 3,
        index_id: 77,
      },
    ),
    DdlRecord::new(
      2,
      10,
      Kind::DeleteSpace {
        space_id: 5,
        path: "./db/t1.ibd".into(),
      },
    ),
    DdlRecord::new(
      3,
      11,
      Kind::RenameSpace {
        space_id: 6,
        old_path: "./db/a.ibd".into(),
        new_path: "./db/b.ibd".into(),
      },
    ),
    DdlRecord::new(4, 11, Kind::Drop { table_id: 1001 }),
    DdlRecord::new(
      5,
      12,
      Kind::RenameTable {
        table_id: 1002,
        old_name: "db/a".into(),
        new_name: "db/b".into(),
      },
    ),
    DdlRecord::new(
      6,
      12,
      Kind::RemoveCache {
        table_id: 1003,
        name: "db/c".into(),
      },
    ),
  ]
}

#[test]
fn test_accessors() {
  let recs = samples();
  assert_eq!(recs[0].log_type(), LogType::FreeTree);
  assert_eq!(recs[0].page_no(), Some(3));
  assert_eq!(recs[0].index_id(), Some(77));
  assert_eq!(recs[0].table_id(), None);
  assert_eq!(recs[1].old_file_path(), Some("./db/t1.ibd"));
  assert_eq!(recs[1].new_file_path(), None);
  assert_eq!(recs[4].old_file_path(), Some("db/a"));
  assert_eq!(recs[4].new_file_path(), Some("db/b"));
  assert_eq!(recs[5].new_file_path(), Some("db/c"));
  assert_eq!(recs[3].space_id(), None);
  assert_eq!(LogType::RemoveCache.code(), 6);
  assert_eq!(LogType::RenameTable.to_string(), "RENAME TABLE");
  assert_eq!(
    recs[3].to_string(),
    "[DDL record: DROP, id=4, thread_id=11, table_id=1001]"
  );
}

#[test]
fn test_row_to_record() -> Void {
  for rec in samples() {
    let row = Row::from(&rec);
    assert_eq!(row.id(), Some(rec.id));
    assert_eq!(row.thread_id(), Some(rec.thread_id));

    let mut buf = Vec::new();
    row.encode(&mut buf);
    let back = DdlRecord::from_row(&Row::decode(&buf)?)?;
    assert_eq!(back, rec);
    info!("{} ok", rec.log_type());
  }
  OK
}

#[test]
fn test_unused_columns_stay_null() {
  let rec = DdlRecord::new(4, 11, Kind::Drop { table_id: 1001 });
  let row = Row::from(&rec);
  assert!(row.get(Col::SpaceId).is_none());
  assert!(row.get(Col::OldFilePath).is_none());
  assert_eq!(row.get(Col::TableId), Some(&1001u64.to_be_bytes()[..]));
}

#[test]
fn test_path_keeps_nul_on_disk() {
  let rec = samples().remove(1);
  let row = Row::from(&rec);
  let data = row.get(Col::OldFilePath).unwrap();
  assert_eq!(data.last(), Some(&0));
  assert_eq!(&data[..data.len() - 1], b"./db/t1.ibd");
}

#[test]
fn test_bad_length() {
  let mut b = RecordBuilder::default();
  let err = b.set_field(Col::SpaceId, &[0u8; 8]).unwrap_err();
  assert!(matches!(
    err,
    Error::Len {
      col: Col::SpaceId,
      len: 8,
      expect: 4
    }
  ));
}

#[test]
fn test_unknown_type() {
  let mut row = Row::from(&samples()[3]);
  row.set(Col::Type, 99u32.to_be_bytes());
  assert!(matches!(DdlRecord::from_row(&row), Err(Error::Type(99))));
}

#[test]
fn test_missing_column() {
  let mut row = Row::default();
  row.set(Col::Id, 1u64.to_be_bytes());
  row.set(Col::ThreadId, 1u64.to_be_bytes());
  row.set(Col::Type, LogType::Drop.code().to_be_bytes());
  assert!(matches!(
    DdlRecord::from_row(&row),
    Err(Error::Missing(Col::TableId))
  ));
}

#[test]
fn test_truncated_image() {
  let mut buf = Vec::new();
  Row::from(&samples()[2]).encode(&mut buf);
  buf.truncate(buf.len() - 3);
  assert!(matches!(Row::decode(&buf), Err(Error::Short)));
  assert!(matches!(Row::decode(&[1]), Err(Error::Short)));
}

#[test]
fn test_unknown_column_bit() {
  let mut buf = Vec::new();
  Row::from(&samples()[0]).encode(&mut buf);
  buf[1] |= 0x80;
  assert!(matches!(Row::decode(&buf), Err(Error::Bitmap(b)) if b & 0x8000 != 0));
  assert_eq!(Col::from_pos(Col::TableId.pos()), Some(Col::TableId));
  assert_eq!(Col::from_pos(Col::ALL.len()), None);
}

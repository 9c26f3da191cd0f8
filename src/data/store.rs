use crate::{
    data::student::{Student, StudentId, StudentRecord},
    error::{
        CreateStoreSnafu, MissingStudentSnafu, ParseStoreSnafu, ReadStoreSnafu, RosterResult,
        SerialiseStoreSnafu, WriteStoreSnafu,
    },
};
use snafu::{OptionExt, ResultExt};
use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// The roster, kept as one JSON array in a single file.
///
/// Every operation loads the whole file. Mutations hold `write_lock` for the full
/// read-modify-write cycle so overlapping requests can't drop each other's changes, and land via a
/// sibling temporary file that is renamed into place.
#[derive(Clone, Debug)]
pub struct StudentStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl StudentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the roster file as `[]`, returning `false` if something else created it first.
    async fn create_empty(&self) -> RosterResult<bool> {
        let path = self.path.as_path();
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(mut file) => {
                info!(?path, "No roster file found, creating an empty one");
                file.write_all(b"[]")
                    .await
                    .context(CreateStoreSnafu { path })?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(source) => Err(source).context(CreateStoreSnafu { path }),
        }
    }

    async fn read_records(&self) -> RosterResult<Vec<StudentRecord>> {
        let path = self.path.as_path();
        let contents = loop {
            match fs::read_to_string(path).await {
                Ok(contents) => break contents,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    if self.create_empty().await? {
                        return Ok(vec![]);
                    }
                }
                Err(source) => return Err(source).context(ReadStoreSnafu { path }),
            }
        };

        // a file that was only just created may not have its `[]` yet
        if contents.trim().is_empty() {
            return Ok(vec![]);
        }

        serde_json::from_str(&contents).context(ParseStoreSnafu { path })
    }

    async fn write_records(&self, records: &[StudentRecord]) -> RosterResult<()> {
        let path = self.path.as_path();
        let serialised = serde_json::to_string_pretty(records).context(SerialiseStoreSnafu)?;

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, serialised)
            .await
            .context(WriteStoreSnafu { path: &tmp_path })?;
        fs::rename(&tmp_path, path)
            .await
            .context(WriteStoreSnafu { path })
    }

    /// The full roster, in insertion order.
    pub async fn list(&self) -> RosterResult<Vec<Student>> {
        let records = self.read_records().await?;
        if records.iter().any(|record| record.id.is_none()) {
            warn!("Roster contains students without IDs, backfilling before listing");
            return Ok(self.backfill_ids().await?.0);
        }

        Ok(records
            .into_iter()
            .filter_map(|record| record.id.map(|id| record.into_student(id)))
            .collect())
    }

    /// Stores a new student at the end of the roster, generating an ID unless the record brings an
    /// unused one.
    pub async fn append(&self, record: StudentRecord) -> RosterResult<Student> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        let taken: HashSet<StudentId> = records.iter().filter_map(|r| r.id).collect();

        let id = match record.id {
            Some(id) if !taken.contains(&id) => id,
            _ => StudentId::generate(&taken),
        };
        let student = record.into_student(id);

        records.push(student.clone().into());
        self.write_records(&records).await?;

        Ok(student)
    }

    /// Removes the student whose ID matches `id` when both are written out as strings.
    pub async fn remove_by_id(&self, id: &str) -> RosterResult<Student> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        let (position, removed_id) = records
            .iter()
            .enumerate()
            .find_map(|(i, record)| {
                record
                    .id
                    .filter(|existing| existing.matches(id))
                    .map(|existing| (i, existing))
            })
            .context(MissingStudentSnafu { id })?;

        let removed = records.remove(position).into_student(removed_id);
        self.write_records(&records).await?;

        Ok(removed)
    }

    /// Gives every student lacking an ID a fresh one, rewriting the file once if anything changed.
    /// Returns the resulting roster and how many students were given an ID.
    pub async fn backfill_ids(&self) -> RosterResult<(Vec<Student>, usize)> {
        let _guard = self.write_lock.lock().await;

        let records = self.read_records().await?;
        let mut taken: HashSet<StudentId> = records.iter().filter_map(|r| r.id).collect();

        let mut changed = 0;
        let students: Vec<Student> = records
            .into_iter()
            .map(|record| {
                let id = record.id.unwrap_or_else(|| {
                    changed += 1;
                    let id = StudentId::generate(&taken);
                    taken.insert(id);
                    id
                });
                record.into_student(id)
            })
            .collect();

        if changed > 0 {
            let records: Vec<StudentRecord> = students.iter().cloned().map(Into::into).collect();
            self.write_records(&records).await?;
        }

        Ok((students, changed))
    }
}

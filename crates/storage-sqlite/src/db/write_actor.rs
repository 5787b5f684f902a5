use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::error;
use perfolio_core::errors::{DatabaseError, Error, Result};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A job runs against the writer's dedicated connection and reports a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, Reply)>,
}

fn writer_stopped(detail: &str) -> Error {
    Error::Database(DatabaseError::Internal(format!("writer actor {}", detail)))
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// Each job runs inside its own immediate transaction, so a failed job
    /// leaves no partial writes behind.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_stopped("is no longer accepting jobs"))?;

        let boxed = ret_rx
            .await
            .map_err(|_| writer_stopped("dropped the reply without a result"))??;

        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| writer_stopped("returned a result of an unexpected type"))
    }
}

/// Spawns a background Tokio task that acts as a single writer to the database.
///
/// The actor owns one connection from the pool and processes write jobs
/// serially. If no connection can be acquired, every job is answered with a
/// connection error.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, Reply)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a database connection: {}", e);
                let message = e.to_string();
                while let Some((_, reply_tx)) = rx.recv().await {
                    let _ = reply_tx.send(Err(Error::Database(DatabaseError::ConnectionFailed(
                        message.clone(),
                    ))));
                }
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| {
                    error!("Database write failed: {}", e);
                    e.into()
                });

            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}

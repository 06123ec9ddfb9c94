use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    NewJob(Job),
    Terminate,
}

struct Worker {
    _id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Worker {
        let thread = thread::Builder::new()
            .name(format!("ecp-worker-{}", id))
            .spawn(move || {
                loop {
                    let message = receiver.lock().unwrap().recv();
                    match message {
                        Ok(Message::NewJob(job)) => job(),
                        Ok(Message::Terminate) => break,
                        Err(_) => break,
                    }
                }
            })
            .expect("failed to spawn worker thread");

        Worker {
            _id: id,
            thread: Some(thread),
        }
    }
}

/// Fixed pool of connection-handler threads. Each worker owns its own
/// channel so keyed jobs can be pinned to a stable worker.
pub struct ThreadPool {
    workers: Vec<Worker>,
    senders: Vec<mpsc::Sender<Message>>,
    next: AtomicUsize,
    size: usize,
}

impl ThreadPool {
    pub fn new(size: usize) -> ThreadPool {
        assert!(size > 0);

        let mut workers = Vec::with_capacity(size);
        let mut senders = Vec::with_capacity(size);

        for id in 0..size {
            let (sender, receiver) = mpsc::channel();
            workers.push(Worker::new(id, Arc::new(Mutex::new(receiver))));
            senders.push(sender);
        }

        ThreadPool {
            workers,
            senders,
            next: AtomicUsize::new(0),
            size,
        }
    }

    /// Run a job on the pool. Jobs sharing a key land on the same worker and
    /// therefore run sequentially relative to each other; unkeyed jobs are
    /// spread round-robin.
    pub fn execute<F, K>(&self, f: F, key: Option<K>)
    where
        F: FnOnce() + Send + 'static,
        K: Hash,
    {
        let worker_idx = match key {
            Some(k) => {
                let mut hasher = DefaultHasher::new();
                k.hash(&mut hasher);
                (hasher.finish() as usize) % self.size
            }
            None => self.next.fetch_add(1, Ordering::Relaxed) % self.size,
        };

        let _ = self.senders[worker_idx].send(Message::NewJob(Box::new(f)));
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for sender in &self.senders {
            let _ = sender.send(Message::Terminate);
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn test_pool_creation() {
        let pool = ThreadPool::new(4);
        assert_eq!(pool.size, 4);
        assert_eq!(pool.workers.len(), 4);
    }

    #[test]
    #[should_panic]
    fn test_zero_size_panics() {
        ThreadPool::new(0);
    }

    #[test]
    fn test_executes_jobs() {
        let pool = ThreadPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            pool.execute(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                None::<usize>,
            );
        }

        thread::sleep(Duration::from_millis(100));
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_same_key_runs_in_order() {
        let pool = ThreadPool::new(4);
        let results = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let results = Arc::clone(&results);
            pool.execute(
                move || {
                    results.lock().unwrap().push(i);
                },
                Some("same-client"),
            );
        }

        thread::sleep(Duration::from_millis(100));
        assert_eq!(*results.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_drop_waits_for_in_flight_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = ThreadPool::new(2);
            let counter = Arc::clone(&counter);
            pool.execute(
                move || {
                    thread::sleep(Duration::from_millis(50));
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                None::<usize>,
            );
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}

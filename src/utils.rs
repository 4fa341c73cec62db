use tracing::subscriber::SetGlobalDefaultError;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

/// Installs the console subscriber on stderr as the global default.
pub fn init_logging(verbose: bool) -> Result<(), SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(console_subscriber(verbose, std::io::stderr))
}

/// Plain-text subscriber writing to `make_writer`.
///
/// At INFO each event prints as its bare message, so progress and test
/// summary lines come out verbatim. `verbose` lowers the level to DEBUG and
/// prefixes each line with its level.
pub fn console_subscriber<W>(verbose: bool, make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_level(verbose)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(level)
        .with_writer(make_writer)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use rand::{rngs::StdRng, SeedableRng};

    use crate::data::dataset::Dataset;
    use crate::model::mlp::Mlp;
    use crate::train::{train_loop, Tester, TrainConfig};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes).lines().map(|l| l.trim().to_string()).collect()
        }
    }

    #[test]
    fn info_lines_are_printed_verbatim() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = console_subscriber(false, move || writer.clone());

        let train = Dataset::from_rows(vec![vec![0.0], vec![1.0]], &[0.0, 1.0]).unwrap();
        let config = TrainConfig { log_every: 2, ..TrainConfig::new(5, 1, 0.1) };
        let mut rng = StdRng::seed_from_u64(3);
        let mut mlp = Mlp::with_rng(1, 2, 1, &mut rng).unwrap();

        let (history, report) = tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden at INFO");
            let history = train_loop(&mut mlp, &train, &train, &config, &mut rng).unwrap();
            (history, Tester::test(&mlp, &train).unwrap())
        });

        let lines = capture.lines();
        assert_eq!(lines.len(), 3, "{lines:?}");
        assert!(lines[0].starts_with("Epoch 2/5, Train Loss: "));
        assert!(lines[1].starts_with("Epoch 4/5, Train Loss: "));
        assert_eq!(lines[2], report.summary_line());
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn verbose_adds_debug_events() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = console_subscriber(true, move || writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("step detail");
            tracing::info!("summary");
        });

        let lines = capture.lines();
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert!(lines[0].contains("DEBUG") && lines[0].ends_with("step detail"));
        assert!(lines[1].contains("INFO") && lines[1].ends_with("summary"));
    }
}

//! Producer → pipe → consumer integration tests.
//!
//! Every run goes through the real job runner, codec and demultiplexer;
//! only the PDF library is replaced (see `common::FakeBackend`).

mod common;

use common::{fake_pdf, fake_png, list_files, produce_bytes, run_pipeline, PASSWORD};
use pdf_processor::codec::frame::DEFAULT_MAX_PAYLOAD_LEN;
use pdf_processor::{
    dump_stream, run_job, Artifact, ArtifactDecoder, ArtifactEncoder, DumpError, ExtractMode,
    JobConfig, JobOutcome, OpenError, ProducerError, StreamError, ThumbnailPages,
};

fn extract_only() -> JobConfig {
    JobConfig::builder()
        .mode(ExtractMode::ExtractOnly)
        .build()
        .unwrap()
}

fn split() -> JobConfig {
    JobConfig::builder()
        .mode(ExtractMode::Split)
        .build()
        .unwrap()
}

// ── Sample documents ─────────────────────────────────────────────────────────

#[tokio::test]
async fn two_pages_extract_only() {
    let run = run_pipeline("2-pages.pdf", &extract_only()).await;
    let job = run.job.as_ref().expect("job ok");
    let dump = run.dump.as_ref().expect("dump ok");

    assert_eq!(job.outcome, JobOutcome::Completed);
    assert_eq!(job.page_count, Some(2));
    assert_eq!(dump.page_count, Some(2));

    assert_eq!(run.read("n-pages"), "2");
    assert_eq!(run.read("p1.txt"), "Page 1");
    assert_eq!(run.read("p2.txt"), "Page 2");
    assert_eq!(run.read_bytes("p1.png"), fake_png(1, 700));
    assert!(!run.exists("p2.png"));
    assert!(!run.exists("p1.pdf"));
    assert!(!run.exists("error.txt"));
    assert_eq!(
        run.files(),
        vec!["n-pages", "p1.is-ocr", "p1.png", "p1.txt", "p2.is-ocr", "p2.txt"]
    );
}

#[tokio::test]
async fn encrypted_document_reports_password_error() {
    let run = run_pipeline("empty-page-encrypted.pdf", &extract_only()).await;
    let job = run.job.as_ref().expect("a job error is not a producer failure");

    assert_eq!(job.outcome, JobOutcome::Failed(OpenError::PasswordProtected));
    assert_eq!(
        run.read("error.txt"),
        "Failed to open PDF: file is password-protected"
    );
    assert!(!run.exists("n-pages"));
    assert_eq!(run.files(), vec!["error.txt"]);
}

#[tokio::test]
async fn encrypted_document_opens_with_its_password() {
    let config = JobConfig::builder().password(PASSWORD).build().unwrap();
    let run = run_pipeline("empty-page-encrypted.pdf", &config).await;
    assert!(run.dump.is_ok());
    assert_eq!(run.read("n-pages"), "1");
    assert_eq!(run.read("p1.txt"), "");
    assert!(!run.exists("error.txt"));
}

#[tokio::test]
async fn not_a_pdf_reports_invalid_format() {
    let run = run_pipeline("not-a-pdf.pdf", &extract_only()).await;
    assert!(run.job.is_ok());
    assert_eq!(
        run.read("error.txt"),
        "Failed to open PDF: file is not a valid PDF"
    );
    assert!(!run.exists("n-pages"));
}

#[tokio::test]
async fn owner_protected_document_is_extracted() {
    let run = run_pipeline("owner-protected.pdf", &extract_only()).await;
    assert_eq!(run.read("n-pages"), "1");
    assert_eq!(run.read("p1.txt"), "foo");
    assert!(!run.exists("error.txt"));
}

#[tokio::test]
async fn empty_page_has_empty_text() {
    let run = run_pipeline("empty-page.pdf", &extract_only()).await;
    assert_eq!(run.read("n-pages"), "1");
    assert_eq!(run.read("p1.txt"), "");
    assert_eq!(run.read("p1.is-ocr"), "false");
    assert!(!run.exists("error.txt"));
}

#[tokio::test]
async fn broken_second_page_degrades_without_job_error() {
    let run = run_pipeline("2nd-page-invalid.pdf", &extract_only()).await;
    let job = run.job.as_ref().expect("job ok");

    assert_eq!(job.degraded_pages, 1);
    assert_eq!(run.read("n-pages"), "2");
    assert_eq!(run.read("p1.txt"), "Page 1");
    assert_eq!(run.read("p2.txt"), "");
    assert_eq!(run.read("p2.is-ocr"), "false");
    assert!(!run.exists("error.txt"));
}

#[tokio::test]
async fn scanned_first_page_is_flagged() {
    let run = run_pipeline("ocr-on-p1.pdf", &extract_only()).await;
    assert_eq!(run.read("p1.is-ocr"), "true");
    assert_eq!(run.read("p2.is-ocr"), "false");
    assert_eq!(run.read("p1.txt"), "Page 1");
}

#[tokio::test]
async fn split_mode_writes_a_pdf_and_thumbnail_per_page() {
    let run = run_pipeline("2-pages.pdf", &split()).await;
    assert!(run.dump.is_ok());
    assert_eq!(run.read_bytes("p1.pdf"), fake_pdf(1));
    assert_eq!(run.read_bytes("p2.pdf"), fake_pdf(2));
    assert_eq!(run.read_bytes("p1.png"), fake_png(1, 700));
    assert_eq!(run.read_bytes("p2.png"), fake_png(2, 700));
    assert_eq!(run.read("p1.txt"), "Page 1");
}

#[tokio::test]
async fn thumbnails_can_be_disabled_and_resized() {
    let none = JobConfig::builder()
        .thumbnails(ThumbnailPages::None)
        .build()
        .unwrap();
    let run = run_pipeline("2-pages.pdf", &none).await;
    assert!(!run.exists("p1.png"));

    let small = JobConfig::builder().thumbnail_dimension(128).build().unwrap();
    let run = run_pipeline("2-pages.pdf", &small).await;
    assert_eq!(run.read_bytes("p1.png"), fake_png(1, 128));
}

#[tokio::test]
async fn text_is_normalised_and_capped() {
    let run = run_pipeline("form-feed.pdf", &extract_only()).await;
    assert_eq!(run.read("p1.txt"), "one two");

    let capped = JobConfig::builder().max_text_chars(3).build().unwrap();
    let run = run_pipeline("form-feed.pdf", &capped).await;
    assert_eq!(run.read("p1.txt"), "one");
}

#[tokio::test]
async fn zero_page_document_writes_only_the_count() {
    let run = run_pipeline("zero-pages.pdf", &extract_only()).await;
    assert_eq!(run.read("n-pages"), "0");
    assert_eq!(run.files(), vec!["n-pages"]);
}

#[tokio::test]
async fn missing_input_reports_unreadable_file() {
    let out = tempfile::tempdir().unwrap();
    let (writer, reader) = tokio::io::duplex(256);
    let config = extract_only();
    let (job, dump) = tokio::join!(
        run_job(
            common::FakeBackend,
            std::path::Path::new("/no/such/2-pages.pdf"),
            &config,
            writer
        ),
        dump_stream(reader, out.path(), DEFAULT_MAX_PAYLOAD_LEN),
    );
    assert_eq!(
        job.unwrap().outcome,
        JobOutcome::Failed(OpenError::FileUnreadable)
    );
    assert_eq!(
        dump.unwrap().error.as_deref(),
        Some("Failed to open PDF: file not found or could not be opened")
    );
}

// ── Stream properties ────────────────────────────────────────────────────────

#[tokio::test]
async fn many_pages_flow_through_a_small_pipe() {
    let run = run_pipeline("long.pdf", &split()).await;
    let job = run.job.as_ref().expect("job ok");
    let dump = run.dump.as_ref().expect("dump ok");

    assert_eq!(dump.page_count, Some(40));
    // n-pages + 40 × (txt, is-ocr, png, pdf)
    assert_eq!(dump.files.len(), 1 + 40 * 4);
    assert_eq!(job.frames_written, dump.files.len() as u64);
    assert_eq!(run.read("p40.txt"), "lorem ipsum");
}

#[tokio::test]
async fn stream_is_ordered_by_page() {
    let bytes = produce_bytes("long.pdf", &split()).await;
    let mut decoder = ArtifactDecoder::new(&bytes[..]);

    let mut last_page = 0;
    let mut first = true;
    while let Some(artifact) = decoder.next_artifact().await.unwrap() {
        if first {
            assert_eq!(artifact, Artifact::PageCount(40));
            first = false;
            continue;
        }
        let page = artifact.page().expect("page artifact");
        assert!(page >= last_page, "page {page} after {last_page}");
        last_page = page;
    }
    assert_eq!(last_page, 40);
}

#[tokio::test]
async fn runs_are_repeatable() {
    let a = run_pipeline("2-pages.pdf", &split()).await;
    let b = run_pipeline("2-pages.pdf", &split()).await;
    assert_eq!(a.files(), b.files());
    for name in a.files() {
        assert_eq!(a.read_bytes(&name), b.read_bytes(&name), "{name} differs");
    }
}

#[tokio::test]
async fn truncated_stream_fails_the_consumer() {
    let bytes = produce_bytes("2-pages.pdf", &extract_only()).await;
    let out = tempfile::tempdir().unwrap();

    // Drop the end-of-stream frame: the producer died before finishing.
    let cut = &bytes[..bytes.len() - 9];
    let err = dump_stream(cut, out.path(), DEFAULT_MAX_PAYLOAD_LEN)
        .await
        .unwrap_err();
    assert!(
        matches!(err, DumpError::Stream(StreamError::Truncated { .. })),
        "got {err:?}"
    );
    // Every artifact before the cut made it out intact.
    assert_eq!(
        std::fs::read_to_string(out.path().join("p2.txt")).unwrap(),
        "Page 2"
    );
    assert!(list_files(out.path()).iter().all(|f| !f.ends_with(".tmp")));
}

#[tokio::test]
async fn consumer_going_away_fails_the_producer() {
    let inputs = tempfile::tempdir().unwrap();
    let input = inputs.path().join("long.pdf");
    std::fs::write(&input, b"%PDF").unwrap();

    let (writer, reader) = tokio::io::duplex(64);
    drop(reader);

    let err = run_job(common::FakeBackend, &input, &split(), writer)
        .await
        .unwrap_err();
    assert!(matches!(err, ProducerError::StreamWrite(_)), "got {err:?}");
}

#[tokio::test]
async fn out_of_order_stream_is_rejected() {
    let mut enc = ArtifactEncoder::new(Vec::new());
    for artifact in [
        Artifact::PageCount(2),
        Artifact::PageText {
            page: 2,
            text: "Page 2".into(),
        },
        Artifact::PageText {
            page: 1,
            text: "Page 1".into(),
        },
    ] {
        enc.write_artifact(&artifact).await.unwrap();
    }
    let bytes = enc.finish().await.unwrap();

    let out = tempfile::tempdir().unwrap();
    let err = dump_stream(&bytes[..], out.path(), DEFAULT_MAX_PAYLOAD_LEN)
        .await
        .unwrap_err();
    assert!(
        matches!(err, DumpError::Stream(StreamError::OutOfOrder(_))),
        "got {err:?}"
    );
}

#[tokio::test]
async fn page_artifact_before_count_is_rejected() {
    let mut enc = ArtifactEncoder::new(Vec::new());
    enc.write_artifact(&Artifact::PageIsOcr {
        page: 1,
        is_ocr: false,
    })
    .await
    .unwrap();
    let bytes = enc.finish().await.unwrap();

    let out = tempfile::tempdir().unwrap();
    let err = dump_stream(&bytes[..], out.path(), DEFAULT_MAX_PAYLOAD_LEN)
        .await
        .unwrap_err();
    assert!(matches!(err, DumpError::Stream(StreamError::OutOfOrder(_))));
    assert!(list_files(out.path()).is_empty());
}

#[tokio::test]
async fn garbage_input_is_not_a_stream() {
    let out = tempfile::tempdir().unwrap();
    let err = dump_stream(&b"Page 1\x0cPage 2"[..], out.path(), DEFAULT_MAX_PAYLOAD_LEN)
        .await
        .unwrap_err();
    assert!(matches!(err, DumpError::Stream(StreamError::BadMagic { .. })));
}

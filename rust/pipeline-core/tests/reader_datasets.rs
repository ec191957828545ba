// rust/pipeline-core/tests/reader_datasets.rs

//! End-to-end pipelines over text, fixed-length and framed files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use tempfile::TempDir;

use pipeline_core::{
    CompressionType, DType, Dataset, DatasetIterator, ElementSpec, ErrorKind, Feed,
    FramedRecordWriter, Param, PipelineConfig, ReaderDataset, Value,
};

const NUM_FILES: usize = 2;

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn write_compressed(path: &Path, contents: &[u8], compression: CompressionType) {
    let file = File::create(path).unwrap();
    match compression {
        CompressionType::None => {
            let mut file = file;
            file.write_all(contents).unwrap();
        }
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(contents).unwrap();
            encoder.finish().unwrap();
        }
        CompressionType::Zlib => {
            let mut encoder = ZlibEncoder::new(file, Compression::default());
            encoder.write_all(contents).unwrap();
            encoder.finish().unwrap();
        }
    }
}

fn line(file: usize, line: usize) -> String {
    format!("{file}: {line}")
}

/// Writes `NUM_FILES` files of 5 lines. The last file has no final terminator.
fn create_text_files(
    dir: &TempDir,
    crlf: bool,
    compression: CompressionType,
) -> Vec<String> {
    let terminator = if crlf { "\r\n" } else { "\n" };
    (0..NUM_FILES)
        .map(|i| {
            let mut contents = String::new();
            for j in 0..5 {
                contents.push_str(&line(i, j));
                if j + 1 < 5 || i + 1 < NUM_FILES {
                    contents.push_str(terminator);
                }
            }
            let path = dir.path().join(format!("text_line.{i}.txt"));
            write_compressed(&path, contents.as_bytes(), compression);
            path_string(&path)
        })
        .collect()
}

fn next_record(iterator: &mut DatasetIterator) -> String {
    let value = iterator.get_next().unwrap();
    String::from_utf8(value.into_bytes().unwrap().to_vec()).unwrap()
}

fn next_batch(iterator: &mut DatasetIterator) -> Vec<String> {
    let value = iterator.get_next().unwrap();
    value
        .into_records()
        .unwrap()
        .into_iter()
        .map(|b| String::from_utf8(b.to_vec()).unwrap())
        .collect()
}

fn assert_exhausted(iterator: &mut DatasetIterator) {
    for _ in 0..2 {
        let err = iterator.get_next().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }
}

fn drain(iterator: &mut DatasetIterator) -> Vec<Value> {
    let mut values = vec![];
    loop {
        match iterator.get_next() {
            Ok(value) => values.push(value),
            Err(e) if e.is_out_of_range() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    values
}

fn text_pipelines(compression: CompressionType) -> (Dataset, Dataset) {
    let source = ReaderDataset::text_line(Param::placeholder("filenames"))
        .compression_type(compression.as_str());
    let repeat = source.repeat(Param::placeholder("num_epochs"));
    let batch = repeat.clone().batch(Param::placeholder("batch_size"));
    (repeat, batch)
}

fn text_feed(files: &[String], num_epochs: i64) -> Feed {
    Feed::new()
        .with("filenames", files.to_vec())
        .with("num_epochs", num_epochs)
}

fn check_text_line_dataset(crlf: bool, compression: CompressionType) {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, crlf, compression);
    let (repeat, batch) = text_pipelines(compression);

    let mut iterator = DatasetIterator::from_structure(ElementSpec::of_type(DType::String));

    // Basic test: read from file 0.
    iterator
        .initialize(&repeat, &text_feed(&files[..1], 1))
        .unwrap();
    for j in 0..5 {
        assert_eq!(next_record(&mut iterator), line(0, j));
    }
    assert_exhausted(&mut iterator);

    // Basic test: read from file 1.
    iterator
        .initialize(&repeat, &text_feed(&files[1..], 1))
        .unwrap();
    for j in 0..5 {
        assert_eq!(next_record(&mut iterator), line(1, j));
    }
    assert_exhausted(&mut iterator);

    // Basic test: read from both files.
    iterator.initialize(&repeat, &text_feed(&files, 1)).unwrap();
    for i in 0..NUM_FILES {
        for j in 0..5 {
            assert_eq!(next_record(&mut iterator), line(i, j));
        }
    }
    assert_exhausted(&mut iterator);

    // Test repeated iteration through both files.
    iterator.initialize(&repeat, &text_feed(&files, 10)).unwrap();
    for _ in 0..10 {
        for i in 0..NUM_FILES {
            for j in 0..5 {
                assert_eq!(next_record(&mut iterator), line(i, j));
            }
        }
    }
    assert_exhausted(&mut iterator);

    // Test batched and repeated iteration through both files.
    let feed = text_feed(&files, 10).with("batch_size", 5i64);
    iterator.initialize(&batch, &feed).unwrap();
    for _ in 0..10 {
        for i in 0..NUM_FILES {
            let expected: Vec<String> = (0..5).map(|j| line(i, j)).collect();
            assert_eq!(next_batch(&mut iterator), expected);
        }
    }
    assert_exhausted(&mut iterator);

    // Zero epochs yields nothing.
    iterator.initialize(&repeat, &text_feed(&files, 0)).unwrap();
    assert_exhausted(&mut iterator);
}

#[test]
fn test_text_line_dataset() {
    check_text_line_dataset(false, CompressionType::None);
}

#[test]
fn test_text_line_dataset_crlf() {
    check_text_line_dataset(true, CompressionType::None);
}

#[test]
fn test_text_line_dataset_gzip() {
    check_text_line_dataset(false, CompressionType::Gzip);
    check_text_line_dataset(true, CompressionType::Gzip);
}

#[test]
fn test_text_line_dataset_zlib() {
    check_text_line_dataset(false, CompressionType::Zlib);
    check_text_line_dataset(true, CompressionType::Zlib);
}

#[test]
fn test_text_line_buffer_size_invariance() {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, true, CompressionType::Gzip);

    let read_all = |buffer_size: i64| {
        let dataset = ReaderDataset::text_line(files.clone())
            .compression_type("GZIP")
            .buffer_size(buffer_size)
            .into_dataset();
        let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
        drain(&mut iterator)
    };

    let small = read_all(10);
    assert_eq!(small.len(), 10);
    assert_eq!(small, read_all(1 << 20));
}

#[test]
fn test_text_line_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = path_string(&dir.path().join("missing.txt"));
    let dataset = ReaderDataset::text_line(vec![missing]).into_dataset();

    let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
    assert_eq!(iterator.get_next().unwrap_err().kind(), ErrorKind::NotFound);
    assert_exhausted(&mut iterator);
}

#[test]
fn test_exhaustion_does_not_touch_files() {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, false, CompressionType::None);
    let dataset = ReaderDataset::text_line(files.clone()).repeat(2i64);

    let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
    assert_eq!(drain(&mut iterator).len(), 20);

    for file in &files {
        std::fs::remove_file(file).unwrap();
    }
    assert_exhausted(&mut iterator);

    // A fresh initialize does see the files are gone.
    iterator.initialize(&dataset, &Feed::new()).unwrap();
    assert_eq!(iterator.get_next().unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_unbound_iterator_and_bad_feeds() {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, false, CompressionType::None);
    let (repeat, batch) = text_pipelines(CompressionType::None);

    let mut iterator = DatasetIterator::default();
    assert_eq!(
        iterator.get_next().unwrap_err().kind(),
        ErrorKind::FailedPrecondition
    );

    // Missing placeholder.
    let feed = Feed::new().with("filenames", files.clone());
    let err = iterator.initialize(&repeat, &feed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // Scalar where a list is expected.
    let feed = Feed::new()
        .with("filenames", files[0].clone())
        .with("num_epochs", 1i64);
    let err = iterator.initialize(&repeat, &feed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // Non-positive batch size.
    let feed = text_feed(&files, 1).with("batch_size", 0i64);
    let err = iterator.initialize(&batch, &feed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // Still unbound after failed initializations.
    assert_eq!(
        iterator.get_next().unwrap_err().kind(),
        ErrorKind::FailedPrecondition
    );
}

#[test]
fn test_unknown_compression_type_fed() {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, false, CompressionType::None);
    let dataset = ReaderDataset::text_line(files)
        .compression_type(Param::placeholder("compression_type"))
        .into_dataset();

    let mut iterator = DatasetIterator::default();
    let err = iterator
        .initialize(&dataset, &Feed::new().with("compression_type", "LZMA"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    iterator
        .initialize(&dataset, &Feed::new().with("compression_type", ""))
        .unwrap();
    assert_eq!(drain(&mut iterator).len(), 10);
}

const HEADER_BYTES: usize = 5;
const RECORD_BYTES: usize = 3;
const FOOTER_BYTES: usize = 2;
const NUM_RECORDS: usize = 7;

fn fixed_record(file: usize, record: usize) -> String {
    (file * 2 + record).to_string().repeat(RECORD_BYTES)
}

fn create_fixed_length_files(dir: &TempDir, compression: CompressionType) -> Vec<String> {
    (0..NUM_FILES)
        .map(|i| {
            let mut contents = b"H".repeat(HEADER_BYTES);
            for j in 0..NUM_RECORDS {
                contents.extend_from_slice(fixed_record(i, j).as_bytes());
            }
            contents.extend_from_slice(&b"F".repeat(FOOTER_BYTES));
            let path = dir.path().join(format!("fixed_length.{i}.bin"));
            write_compressed(&path, &contents, compression);
            path_string(&path)
        })
        .collect()
}

fn fixed_length_pipelines(compression: CompressionType) -> (Dataset, Dataset) {
    let source = ReaderDataset::fixed_length(
        Param::placeholder("filenames"),
        RECORD_BYTES as i64,
        HEADER_BYTES as i64,
        FOOTER_BYTES as i64,
    )
    .compression_type(compression.as_str());
    let repeat = source.repeat(Param::placeholder("num_epochs"));
    let batch = repeat.clone().batch(Param::placeholder("batch_size"));
    (repeat, batch)
}

fn check_fixed_length_dataset(compression: CompressionType) {
    let dir = TempDir::new().unwrap();
    let files = create_fixed_length_files(&dir, compression);
    let (repeat, batch) = fixed_length_pipelines(compression);

    let mut iterator = DatasetIterator::from_structure(ElementSpec::of_type(DType::String));

    for (i, file) in files.iter().enumerate() {
        iterator
            .initialize(&repeat, &text_feed(std::slice::from_ref(file), 1))
            .unwrap();
        for j in 0..NUM_RECORDS {
            assert_eq!(next_record(&mut iterator), fixed_record(i, j));
        }
        assert_exhausted(&mut iterator);
    }

    iterator.initialize(&repeat, &text_feed(&files, 10)).unwrap();
    for _ in 0..10 {
        for i in 0..NUM_FILES {
            for j in 0..NUM_RECORDS {
                assert_eq!(next_record(&mut iterator), fixed_record(i, j));
            }
        }
    }
    assert_exhausted(&mut iterator);

    let feed = text_feed(&files, 10).with("batch_size", NUM_RECORDS as i64);
    iterator.initialize(&batch, &feed).unwrap();
    for _ in 0..10 {
        for i in 0..NUM_FILES {
            let expected: Vec<String> = (0..NUM_RECORDS).map(|j| fixed_record(i, j)).collect();
            assert_eq!(next_batch(&mut iterator), expected);
        }
    }
    assert_exhausted(&mut iterator);
}

#[test]
fn test_fixed_length_dataset() {
    check_fixed_length_dataset(CompressionType::None);
}

#[test]
fn test_fixed_length_dataset_gzip() {
    check_fixed_length_dataset(CompressionType::Gzip);
}

#[test]
fn test_fixed_length_dataset_zlib() {
    check_fixed_length_dataset(CompressionType::Zlib);
}

#[test]
fn test_fixed_length_size_mismatch_fails_initialize() {
    let dir = TempDir::new().unwrap();
    let files = create_fixed_length_files(&dir, CompressionType::None);
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&files[1])
        .unwrap();
    file.write_all(b"x").unwrap();
    drop(file);

    let (repeat, _) = fixed_length_pipelines(CompressionType::None);
    let mut iterator = DatasetIterator::default();
    let err = iterator
        .initialize(&repeat, &text_feed(&files, 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_fixed_length_size_mismatch_gzip_fails_while_reading() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixed.bin.gz");
    let mut contents = b"H".repeat(HEADER_BYTES);
    contents.extend_from_slice(&b"r".repeat(RECORD_BYTES * 2 + 1));
    contents.extend_from_slice(&b"F".repeat(FOOTER_BYTES));
    write_compressed(&path, &contents, CompressionType::Gzip);

    let (repeat, _) = fixed_length_pipelines(CompressionType::Gzip);
    let mut iterator = DatasetIterator::default();
    iterator
        .initialize(&repeat, &text_feed(&[path_string(&path)], 1))
        .unwrap();
    assert_eq!(next_record(&mut iterator), "rrr");
    assert_eq!(next_record(&mut iterator), "rrr");
    assert_eq!(
        iterator.get_next().unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_exhausted(&mut iterator);
}

fn framed_record(file: usize, record: usize) -> String {
    format!("Record {record} of file {file}")
}

fn create_framed_files(dir: &TempDir, compression: CompressionType) -> Vec<String> {
    (0..NUM_FILES)
        .map(|i| {
            let path = dir.path().join(format!("framed.{i}.rec"));
            let mut writer = FramedRecordWriter::create(&path, compression).unwrap();
            for j in 0..NUM_RECORDS {
                writer.write_record(framed_record(i, j).as_bytes()).unwrap();
            }
            writer.finish().unwrap();
            path_string(&path)
        })
        .collect()
}

fn check_framed_dataset(compression: CompressionType) {
    let dir = TempDir::new().unwrap();
    let files = create_framed_files(&dir, compression);

    let source = ReaderDataset::framed(Param::placeholder("filenames"))
        .compression_type(Param::placeholder_with_default("compression_type", String::new()))
        .buffer_size(Param::placeholder_with_default("buffer_size", 256 * 1024i64));
    let repeat = source.repeat(Param::placeholder("num_epochs"));
    let batch = repeat.clone().batch(Param::placeholder("batch_size"));

    let framed_feed = |files: &[String], num_epochs: i64| {
        text_feed(files, num_epochs).with("compression_type", compression.as_str())
    };

    let mut iterator = DatasetIterator::from_structure(ElementSpec::of_type(DType::String));

    for (i, file) in files.iter().enumerate() {
        iterator
            .initialize(&repeat, &framed_feed(std::slice::from_ref(file), 1))
            .unwrap();
        for j in 0..NUM_RECORDS {
            assert_eq!(next_record(&mut iterator), framed_record(i, j));
        }
        assert_exhausted(&mut iterator);
    }

    iterator.initialize(&repeat, &framed_feed(&files, 10)).unwrap();
    for _ in 0..10 {
        for i in 0..NUM_FILES {
            for j in 0..NUM_RECORDS {
                assert_eq!(next_record(&mut iterator), framed_record(i, j));
            }
        }
    }
    assert_exhausted(&mut iterator);

    let feed = framed_feed(&files, 10).with("batch_size", NUM_RECORDS as i64);
    iterator.initialize(&batch, &feed).unwrap();
    for _ in 0..10 {
        for i in 0..NUM_FILES {
            let expected: Vec<String> = (0..NUM_RECORDS).map(|j| framed_record(i, j)).collect();
            assert_eq!(next_batch(&mut iterator), expected);
        }
    }
    assert_exhausted(&mut iterator);

    // The read buffer size does not change the records.
    for buffer_size in [10i64, 1 << 20] {
        let feed = framed_feed(&files, 1).with("buffer_size", buffer_size);
        iterator.initialize(&repeat, &feed).unwrap();
        for i in 0..NUM_FILES {
            for j in 0..NUM_RECORDS {
                assert_eq!(next_record(&mut iterator), framed_record(i, j));
            }
        }
        assert_exhausted(&mut iterator);
    }
}

#[test]
fn test_framed_dataset() {
    check_framed_dataset(CompressionType::None);
}

#[test]
fn test_framed_dataset_gzip() {
    check_framed_dataset(CompressionType::Gzip);
}

#[test]
fn test_framed_dataset_zlib() {
    check_framed_dataset(CompressionType::Zlib);
}

fn framed_bytes(records: &[String]) -> Vec<u8> {
    records
        .iter()
        .flat_map(|r| pipeline_core::readers::encode_frame(r.as_bytes()))
        .collect()
}

#[test]
fn test_framed_payload_bit_flip_is_data_loss() {
    let dir = TempDir::new().unwrap();
    let records: Vec<String> = (0..3).map(|j| framed_record(0, j)).collect();
    let clean = framed_bytes(&records);
    let frame_len = clean.len() / 3;

    // Flip every bit of the second payload in turn.
    let payload = frame_len + 12..2 * frame_len - 4;
    let path = dir.path().join("flipped.rec");
    let dataset = ReaderDataset::framed(vec![path_string(&path)]).into_dataset();
    for byte in payload {
        for bit in 0..8 {
            let mut data = clean.clone();
            data[byte] ^= 1 << bit;
            std::fs::write(&path, &data).unwrap();

            let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
            assert_eq!(next_record(&mut iterator), records[0]);
            let err = iterator.get_next().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DataLoss, "byte {byte} bit {bit}");
        }
    }
}

#[test]
fn test_framed_truncation_is_data_loss() {
    let dir = TempDir::new().unwrap();
    let records: Vec<String> = (0..2).map(|j| framed_record(0, j)).collect();
    let clean = framed_bytes(&records);
    let frame_len = clean.len() / 2;

    let path = dir.path().join("truncated.rec");
    let dataset = ReaderDataset::framed(vec![path_string(&path)]).into_dataset();
    for cut in frame_len + 1..clean.len() {
        std::fs::write(&path, &clean[..cut]).unwrap();

        let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
        assert_eq!(next_record(&mut iterator), records[0]);
        let err = iterator.get_next().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataLoss, "cut at {cut}");
        assert_exhausted(&mut iterator);
    }
}

#[test]
fn test_malformed_gzip_header_is_data_loss() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.txt.gz");
    std::fs::write(&path, b"this is not a gzip stream at all").unwrap();

    let dataset = ReaderDataset::text_line(vec![path_string(&path)])
        .compression_type("GZIP")
        .into_dataset();
    let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
    assert_eq!(iterator.get_next().unwrap_err().kind(), ErrorKind::DataLoss);
    assert_exhausted(&mut iterator);
}

#[test]
fn test_gzip_checksum_mismatch_is_data_loss() {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, false, CompressionType::Gzip);
    let mut data = std::fs::read(&files[0]).unwrap();
    let crc_offset = data.len() - 8;
    data[crc_offset] ^= 0xff;
    std::fs::write(&files[0], &data).unwrap();

    let dataset = ReaderDataset::text_line(vec![files[0].clone()])
        .compression_type("GZIP")
        .into_dataset();
    let results: Vec<_> = DatasetIterator::one_shot(&dataset).unwrap().collect();
    let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind(), ErrorKind::DataLoss);
}

#[test]
fn test_prefetch_matches_direct_read() {
    let dir = TempDir::new().unwrap();
    let files = create_framed_files(&dir, CompressionType::Gzip);
    let base = ReaderDataset::framed(files).compression_type("GZIP").repeat(3i64);

    let mut direct = DatasetIterator::one_shot(&base.clone().batch(4i64)).unwrap();
    let mut prefetched =
        DatasetIterator::one_shot(&base.prefetch(2i64).batch(4i64).prefetch(1i64)).unwrap();

    let expected = drain(&mut direct);
    assert_eq!(expected.len(), 11);
    assert_eq!(drain(&mut prefetched), expected);
    assert_exhausted(&mut prefetched);
}

#[test]
fn test_batch_size_larger_than_dataset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("two.txt");
    std::fs::write(&path, "a\nb\n").unwrap();
    let dataset = ReaderDataset::text_line(vec![path_string(&path)]).batch(1i64 << 40);

    let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
    let batch = iterator.get_next().unwrap();
    assert_eq!(batch.into_records().unwrap(), vec!["a", "b"]);
    assert_exhausted(&mut iterator);
}

#[test]
fn test_prefetch_larger_than_dataset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("two.txt");
    std::fs::write(&path, "a\nb\n").unwrap();
    let dataset = ReaderDataset::text_line(vec![path_string(&path)]).prefetch(1i64 << 40);

    let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
    assert_eq!(drain(&mut iterator).len(), 2);
    assert_exhausted(&mut iterator);
}

#[test]
fn test_reinitialize_with_prefetch_releases_worker() {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, false, CompressionType::None);
    let forever = ReaderDataset::text_line(files.clone()).repeat(-1i64).prefetch(4i64);
    let once = ReaderDataset::text_line(files).repeat(1i64);

    let mut iterator = DatasetIterator::default();
    iterator.initialize(&forever, &Feed::new()).unwrap();
    for _ in 0..25 {
        iterator.get_next().unwrap();
    }

    iterator.initialize(&once, &Feed::new()).unwrap();
    assert_eq!(drain(&mut iterator).len(), 10);
}

#[test]
fn test_config_driven_reader() {
    let dir = TempDir::new().unwrap();
    let files = create_text_files(&dir, false, CompressionType::Zlib);

    let config: PipelineConfig = r#"
[reader]
buffer_size = 10
compression_type = "ZLIB"

[dataset]
prefetch_elements = 3
"#
    .parse()
    .unwrap();

    let dataset = ReaderDataset::text_line(files)
        .with_reader_config(&config.reader)
        .repeat(2i64)
        .with_dataset_config(&config.dataset);

    let records: Vec<Value> = DatasetIterator::one_shot(&dataset)
        .unwrap()
        .collect::<pipeline_core::Result<_>>()
        .unwrap();
    assert_eq!(records.len(), 20);
    assert_eq!(records[5].as_bytes().unwrap(), line(1, 0).as_bytes());
}

#[test]
fn test_memory_mapped_input() {
    let dir = TempDir::new().unwrap();
    let files = create_framed_files(&dir, CompressionType::None);

    let config = pipeline_core::ReaderConfig {
        use_mmap: true,
        mmap_threshold: 1,
        ..Default::default()
    };
    let dataset = ReaderDataset::framed(files)
        .with_reader_config(&config)
        .into_dataset();

    let mut iterator = DatasetIterator::one_shot(&dataset).unwrap();
    for i in 0..NUM_FILES {
        for j in 0..NUM_RECORDS {
            assert_eq!(next_record(&mut iterator), framed_record(i, j));
        }
    }
    assert_exhausted(&mut iterator);
}

//! Integration tests for gifti
//!
//! These tests go through the file system: write with `GiftiWriter`, read
//! back with `GiftiFile::read`, and check external payload handling.

use std::fs;

use gifti::prelude::*;
use proptest::prelude::*;
use tempfile::tempdir;

fn surface() -> GiftiFile {
    let mut file = GiftiFile::new();
    file.metadata_mut().set("UserName", "anonymous");
    file.metadata_mut().set("Date", "Thu Jan  1 00:00:00 1970");

    let coords: Vec<f32> = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ];
    let mut points = DataArray::new(Intent::PointSet, coords, vec![4, 3]).unwrap();
    points
        .metadata_mut()
        .set("AnatomicalStructurePrimary", "CortexLeft");
    points.add_matrix(CoordinateTransform::identity(
        "NIFTI_XFORM_TALAIRACH",
        "NIFTI_XFORM_TALAIRACH",
    ));
    file.add_data_array(points);

    let triangles: Vec<i32> = vec![0, 1, 2, 0, 1, 3, 0, 2, 3, 1, 2, 3];
    file.add_data_array(DataArray::new(Intent::Triangle, triangles, vec![4, 3]).unwrap());
    file
}

/// Test the complete write-read cycle
#[test]
fn test_write_read_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lh.sphere.surf.gii");

    let file = surface();
    let stats = file.write(&path).unwrap();
    assert_eq!(stats.data_arrays_written, 2);
    assert_eq!(stats.external_file, None);
    assert_eq!(stats.document_bytes, fs::metadata(&path).unwrap().len());

    let read = GiftiFile::read(&path).unwrap();
    assert_eq!(read, file);
    assert_eq!(read.metadata().get("UserName"), Some("anonymous"));

    let points = read.data_arrays_with_intent(Intent::PointSet).next().unwrap();
    assert_eq!(points.dimensions(), &[4, 3]);
    assert!(points.matrices()[0].is_identity());
    assert_eq!(points.value_f64(&[3, 2]), Some(1.0));

    let triangles = read.data_array(1).unwrap();
    assert_eq!(triangles.data_type(), DataType::Int32);
    assert_eq!(triangles.values().as_i32().unwrap()[4], 1);
}

/// Every encoding survives a trip through the file system
#[test]
fn test_all_encodings() {
    let dir = tempdir().unwrap();
    let file = surface();

    for encoding in [
        Encoding::Ascii,
        Encoding::Base64Binary,
        Encoding::GZipBase64Binary,
        Encoding::ExternalFileBinary,
    ] {
        let path = dir.path().join(format!("{}.surf.gii", encoding));
        let config = WriterConfig {
            encoding: Some(encoding),
            ..WriterConfig::default()
        };
        let stats = GiftiWriter::new(config).write_file(&file, &path).unwrap();

        let read = GiftiFile::read(&path).unwrap();
        assert_eq!(read.number_of_data_arrays(), 2);
        for (written, parsed) in file.data_arrays().iter().zip(read.data_arrays()) {
            assert_eq!(parsed.encoding(), encoding);
            assert_eq!(parsed.values(), written.values());
        }

        if encoding == Encoding::ExternalFileBinary {
            let companion = stats.external_file.unwrap();
            assert!(companion.exists());
            assert_eq!(stats.external_bytes, 4 * 3 * 4 * 2);
            assert_eq!(read.data_array(1).unwrap().external_file_offset(), 48);
        } else {
            assert_eq!(stats.external_bytes, 0);
        }
    }
}

/// External payloads are resolved against the document's directory
#[test]
fn test_external_file_relative_to_document() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("subject01");
    fs::create_dir(&nested).unwrap();

    let values: Vec<f64> = vec![1.5, -2.5, 3.25, 4.0];
    fs::write(
        nested.join("shape.bin"),
        values
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect::<Vec<u8>>(),
    )
    .unwrap();

    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<GIFTI Version="1.0" NumberOfDataArrays="1">
  <DataArray Intent="NIFTI_INTENT_SHAPE" DataType="NIFTI_TYPE_FLOAT64"
             ArrayIndexingOrder="RowMajorOrder" Dimensionality="1" Dim0="4"
             Encoding="ExternalFileBinary" Endian="LittleEndian"
             ExternalFileName="shape.bin" ExternalFileOffset="0">
    <Data></Data>
  </DataArray>
</GIFTI>"#;
    let path = nested.join("thickness.shape.gii");
    fs::write(&path, xml).unwrap();

    let read = GiftiFile::read(&path).unwrap();
    let array = read.data_array(0).unwrap();
    assert_eq!(array.values().as_f64().unwrap(), values.as_slice());
    assert_eq!(array.external_file_name(), Some("shape.bin"));
}

/// A truncated companion file is an I/O error and nothing is returned
#[test]
fn test_short_external_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("short.bin"), [0u8; 10]).unwrap();

    let xml = r#"<GIFTI Version="1.0">
  <DataArray Intent="NIFTI_INTENT_NONE" DataType="NIFTI_TYPE_INT32"
             ArrayIndexingOrder="RowMajorOrder"
             Dimensionality="1" Dim0="5" Encoding="ExternalFileBinary"
             Endian="LittleEndian" ExternalFileName="short.bin"
             ExternalFileOffset="4">
    <Data/>
  </DataArray>
</GIFTI>"#;
    let path = dir.path().join("short.gii");
    fs::write(&path, xml).unwrap();

    let err = GiftiFile::read(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("short.bin"));
}

/// A missing document is reported as I/O
#[test]
fn test_missing_document() {
    let dir = tempdir().unwrap();
    let err = GiftiFile::read(dir.path().join("absent.gii")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

/// A failed write leaves no partial output behind
#[test]
fn test_failed_write_leaves_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.label.gii");

    let mut file = GiftiFile::new();
    file.set_label_table(Some(
        [Label::new(0, "???").with_color(2.0, 0.0, 0.0, 1.0)]
            .into_iter()
            .collect(),
    ));
    assert!(file.write(&path).is_err());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Overwriting an existing document replaces it whole
#[test]
fn test_overwrite_existing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overwrite.gii");
    fs::write(&path, "not a gifti document").unwrap();

    surface().write(&path).unwrap();
    assert_eq!(GiftiFile::read(&path).unwrap(), surface());
}

/// Label tables and duplicate metadata keys
#[test]
fn test_label_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aparc.label.gii");
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE GIFTI SYSTEM "http://www.nitrc.org/frs/download.php/115/gifti.dtd">
<GIFTI Version="1.0" NumberOfDataArrays="1">
  <MetaData>
    <MD><Name><![CDATA[Subject]]></Name><Value><![CDATA[first]]></Value></MD>
    <MD><Name><![CDATA[Subject]]></Name><Value><![CDATA[second]]></Value></MD>
  </MetaData>
  <LabelTable>
    <Label Key="0" Red="0" Green="0" Blue="0" Alpha="0"><![CDATA[???]]></Label>
    <Label Key="1" Red="0.1" Green="0.4" Blue="0.6" Alpha="1"><![CDATA[bankssts]]></Label>
  </LabelTable>
  <DataArray Intent="NIFTI_INTENT_LABEL" DataType="NIFTI_TYPE_INT32"
             ArrayIndexingOrder="RowMajorOrder" Dimensionality="1" Dim0="4"
             Encoding="ASCII" Endian="LittleEndian"
             ExternalFileName="" ExternalFileOffset="">
    <Data>0 1 1 0</Data>
  </DataArray>
</GIFTI>"#;
    fs::write(&path, xml).unwrap();

    let read = GiftiFile::read(&path).unwrap();
    assert_eq!(read.metadata().len(), 1);
    assert_eq!(read.metadata().get("Subject"), Some("second"));

    let table = read.label_table().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get_by_name("bankssts").unwrap().key, 1);
    assert_eq!(table.get(0).unwrap().rgba(), [0.0, 0.0, 0.0, 0.0]);

    let labels = read.data_arrays_with_intent(Intent::Label).next().unwrap();
    assert_eq!(labels.values().as_i32().unwrap(), &[0, 1, 1, 0]);

    let copy = dir.path().join("copy.label.gii");
    read.write(&copy).unwrap();
    assert_eq!(GiftiFile::read(&copy).unwrap(), read);
}

fn arb_values(len: usize) -> impl Strategy<Value = ArrayValues> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), len).prop_map(ArrayValues::UInt8),
        prop::collection::vec(any::<i8>(), len).prop_map(ArrayValues::Int8),
        prop::collection::vec(any::<i16>(), len).prop_map(ArrayValues::Int16),
        prop::collection::vec(any::<u16>(), len).prop_map(ArrayValues::UInt16),
        prop::collection::vec(any::<i32>(), len).prop_map(ArrayValues::Int32),
        prop::collection::vec(any::<u32>(), len).prop_map(ArrayValues::UInt32),
        prop::collection::vec(any::<i64>(), len).prop_map(ArrayValues::Int64),
        prop::collection::vec(any::<u64>(), len).prop_map(ArrayValues::UInt64),
        prop::collection::vec(-1.0e6f32..1.0e6f32, len).prop_map(ArrayValues::Float32),
        prop::collection::vec(-1.0e12f64..1.0e12f64, len).prop_map(ArrayValues::Float64),
    ]
}

fn arb_array() -> impl Strategy<Value = (Vec<usize>, ArrayValues)> {
    prop::collection::vec(1usize..5, 1..4).prop_flat_map(|dims| {
        let len = dims.iter().product();
        (Just(dims), arb_values(len))
    })
}

fn arb_encoding() -> impl Strategy<Value = Encoding> {
    prop_oneof![
        Just(Encoding::Ascii),
        Just(Encoding::Base64Binary),
        Just(Encoding::GZipBase64Binary),
        Just(Encoding::ExternalFileBinary),
    ]
}

fn arb_endian() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Little), Just(Endian::Big)]
}

fn arb_order() -> impl Strategy<Value = IndexingOrder> {
    prop_oneof![Just(IndexingOrder::RowMajor), Just(IndexingOrder::ColumnMajor)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Any array written in any layout reads back with identical values
    #[test]
    fn prop_file_round_trip(
        (dims, values) in arb_array(),
        encoding in arb_encoding(),
        endian in arb_endian(),
        order in arb_order(),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prop.gii");

        let mut array = DataArray::new(Intent::None, values, dims).unwrap();
        array.set_encoding(encoding);
        array.set_endian(endian);
        array.set_indexing_order(order);
        let mut file = GiftiFile::new();
        file.add_data_array(array.clone());
        file.write(&path).unwrap();

        let read = GiftiFile::read(&path).unwrap();
        let parsed = read.data_array(0).unwrap();
        prop_assert_eq!(parsed.values(), array.values());
        prop_assert_eq!(parsed.dimensions(), array.dimensions());
        prop_assert_eq!(parsed.data_type(), array.data_type());
        prop_assert_eq!(parsed.encoding(), encoding);
        prop_assert_eq!(parsed.endian(), endian);
        prop_assert_eq!(parsed.indexing_order(), order);
    }
}

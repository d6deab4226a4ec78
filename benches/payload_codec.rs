use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gifti::gifti::{
    ArrayValues, DataArray, GiftiFile, GiftiReader, GiftiWriter, PayloadCodec, PayloadLayout,
    PayloadSource, WriterConfig,
};
use gifti::vocabulary::{DataType, Encoding, Endian, IndexingOrder, Intent};

fn vertex_coordinates(num_vertices: usize) -> ArrayValues {
    let values: Vec<f32> = (0..num_vertices * 3)
        .map(|i| (i as f32) * 0.25 - 1000.0)
        .collect();
    ArrayValues::Float32(values)
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_decode");
    let num_vertices = 50_000;
    let dims = [num_vertices, 3];
    let values = vertex_coordinates(num_vertices);

    group.throughput(Throughput::Elements((num_vertices * 3) as u64));
    for encoding in [Encoding::Ascii, Encoding::Base64Binary, Encoding::GZipBase64Binary] {
        for endian in [Endian::Little, Endian::Big] {
            if encoding == Encoding::Ascii && endian == Endian::Big {
                continue;
            }
            let layout = PayloadLayout {
                encoding,
                endian,
                indexing_order: IndexingOrder::RowMajor,
            };
            let text = PayloadCodec::encode_inline(&values, &dims, &layout, 6).unwrap();
            group.bench_with_input(
                BenchmarkId::new(encoding.to_string(), endian.to_string()),
                &text,
                |b, text| {
                    b.iter(|| {
                        let decoded = PayloadCodec::decode(
                            PayloadSource::Inline(text),
                            DataType::Float32,
                            &dims,
                            &layout,
                        )
                        .unwrap();
                        black_box(decoded.len());
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_column_major(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_column_major");
    let num_vertices = 50_000;
    let dims = [num_vertices, 3];
    let values = vertex_coordinates(num_vertices);
    let layout = PayloadLayout {
        encoding: Encoding::Base64Binary,
        endian: Endian::native(),
        indexing_order: IndexingOrder::ColumnMajor,
    };
    let text = PayloadCodec::encode_inline(&values, &dims, &layout, 6).unwrap();

    group.throughput(Throughput::Elements((num_vertices * 3) as u64));
    group.bench_function("decode", |b| {
        b.iter(|| {
            let decoded =
                PayloadCodec::decode(PayloadSource::Inline(&text), DataType::Float32, &dims, &layout)
                    .unwrap();
            black_box(decoded.len());
        })
    });
    group.finish();
}

fn bench_read_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_document");

    for num_vertices in [1_000, 10_000, 100_000] {
        let mut file = GiftiFile::new();
        file.add_data_array(
            DataArray::new(Intent::PointSet, vertex_coordinates(num_vertices), vec![num_vertices, 3])
                .unwrap(),
        );
        let triangles: Vec<i32> = (0..num_vertices as i32 * 3).collect();
        file.add_data_array(
            DataArray::new(Intent::Triangle, triangles, vec![num_vertices, 3]).unwrap(),
        );
        let xml = GiftiWriter::new(WriterConfig::max_compression())
            .write_to_string(&file)
            .unwrap();

        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_vertices), &xml, |b, xml| {
            b.iter(|| {
                let file = GiftiReader::new(Cursor::new(xml.as_bytes())).read().unwrap();
                black_box(file.number_of_data_arrays());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_column_major, bench_read_document);
criterion_main!(benches);

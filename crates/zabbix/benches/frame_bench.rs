use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use zabbix::{Metric, Packet, frame};

fn packet_with_metrics(count: usize) -> Packet {
    let metrics = (0..count)
        .map(|i| Metric::with_clock(format!("srv{i}"), "cpu.load", "0.42", 1700000000))
        .collect();
    Packet::with_clock(metrics, 1700000000)
}

fn frame_encode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_encode");

    for count in [1, 10, 100] {
        let packet = packet_with_metrics(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &packet, |b, packet| {
            b.iter(|| black_box(frame::encode(packet).unwrap()));
        });
    }

    group.finish();
}

fn frame_decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_decode");

    let encoded = frame::encode(&packet_with_metrics(100)).unwrap();
    group.bench_function("metrics_100", |b| {
        b.iter(|| black_box(frame::decode(&encoded).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, frame_encode_benchmark, frame_decode_benchmark);
criterion_main!(benches);

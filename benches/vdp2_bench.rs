// VDP2 Benchmarks
// Performance benchmarks for the beam state machine and the frame build

use criterion::{criterion_group, criterion_main, Criterion};
use saturn_rs::vdp2::registers::offsets;
use saturn_rs::Vdp2;
use std::hint::black_box;
use std::sync::{Arc, Mutex};

fn vdp2_with_nbg0_cells() -> Vdp2 {
    let mut vdp2 = Vdp2::new();
    vdp2.set_texture_cache(Arc::new(Mutex::new(
        saturn_rs::compositor::TextureCache::new(),
    )));
    // Park every slot, then grant NBG0 its pattern-name and character reads
    for offset in [
        offsets::CYCA0L,
        offsets::CYCA0U,
        offsets::CYCA1L,
        offsets::CYCA1U,
        offsets::CYCB0L,
        offsets::CYCB0U,
        offsets::CYCB1L,
        offsets::CYCB1U,
    ] {
        vdp2.write16(offset, 0xFFFF);
    }
    vdp2.write16(offsets::BGON, 0x0001);
    vdp2.write16(offsets::CYCA0L, 0x04FF);
    vdp2.write16(offsets::PRINA, 0x0003);
    vdp2
}

/// Benchmark the per-step timing advance
fn bench_vdp2_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("vdp2_run");

    group.bench_function("run_mid_frame", |b| {
        let mut vdp2 = Vdp2::new();

        b.iter(|| {
            let events = vdp2.run(black_box(3));
            black_box(events);
        });
    });

    group.finish();
}

/// Benchmark one full frame-data build for an enabled cell screen
fn bench_vdp2_frame_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("vdp2_frame_build");
    group.sample_size(20);

    group.bench_function("populate_nbg0_cells", |b| {
        let mut vdp2 = vdp2_with_nbg0_cells();

        b.iter(|| {
            let vactive = vdp2.cycles_per_vactive();
            // Drive a whole frame so the VBlank-In build runs once
            let mut remaining = vactive + 200;
            while remaining > 0 {
                let chunk = remaining.min(200) as u8;
                black_box(vdp2.run(chunk));
                remaining -= u32::from(chunk);
            }
            let frame = vdp2.cycles_per_frame();
            let mut remaining = frame - vactive;
            while remaining > 0 {
                let chunk = remaining.min(200) as u8;
                black_box(vdp2.run(chunk));
                remaining -= u32::from(chunk);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_vdp2_run, bench_vdp2_frame_build);
criterion_main!(benches);

// SH-2 Benchmarks
// Performance benchmarks for instruction dispatch and execution

use criterion::{criterion_group, criterion_main, Criterion};
use saturn_rs::{Bus, Sh2, Sh2Kind, SystemBus};
use std::hint::black_box;

const PROGRAM_BASE: u32 = 0x0600_0000;

fn sh2_with_program(opcodes: &[u16]) -> (Sh2, SystemBus) {
    let mut bus = SystemBus::new();
    for (i, opcode) in opcodes.iter().enumerate() {
        bus.write16(PROGRAM_BASE + (i as u32) * 2, *opcode);
    }
    let mut sh2 = Sh2::new(Sh2Kind::Master);
    sh2.pc = PROGRAM_BASE;
    sh2.r[15] = 0x0600_F000;
    (sh2, bus)
}

/// Benchmark SH-2 instruction execution
/// Tests common instruction patterns to measure dispatch and execution cost
fn bench_sh2_instructions(c: &mut Criterion) {
    let mut group = c.benchmark_group("sh2_instructions");

    // NOP sled (simplest dispatch path)
    group.bench_function("nop", |b| {
        let (mut sh2, mut bus) = sh2_with_program(&[0x0009; 256]);

        b.iter(|| {
            sh2.pc = PROGRAM_BASE;
            sh2.step(black_box(&mut bus));
        });
    });

    // Register ALU mix
    group.bench_function("alu_mix", |b| {
        // ADD R1,R2 ; XOR R2,R3 ; SHLL R3 ; CMP/GT R1,R3
        let (mut sh2, mut bus) = sh2_with_program(&[0x321C, 0x232A, 0x4300, 0x3317]);

        b.iter(|| {
            sh2.pc = PROGRAM_BASE;
            for _ in 0..4 {
                sh2.step(black_box(&mut bus));
            }
        });
    });

    // Memory round trip through work RAM
    group.bench_function("load_store", |b| {
        // MOV.L R0,@-R1 ; MOV.L @R1+,R0
        let (mut sh2, mut bus) = sh2_with_program(&[0x2106, 0x6016]);

        b.iter(|| {
            sh2.pc = PROGRAM_BASE;
            sh2.r[1] = 0x0600_8000;
            sh2.step(black_box(&mut bus));
            sh2.step(black_box(&mut bus));
        });
    });

    // Delayed branch with its slot
    group.bench_function("bra_with_slot", |b| {
        let (mut sh2, mut bus) = sh2_with_program(&[0xA001, 0x0009]);

        b.iter(|| {
            sh2.pc = PROGRAM_BASE;
            sh2.step(black_box(&mut bus));
        });
    });

    // Step divider pass
    group.bench_function("div1", |b| {
        let (mut sh2, mut bus) = sh2_with_program(&[0x3124]);

        b.iter(|| {
            sh2.pc = PROGRAM_BASE;
            sh2.r[1] = 0x1234_5678;
            sh2.r[2] = 0x0000_1234;
            sh2.step(black_box(&mut bus));
        });
    });

    group.finish();
}

/// Benchmark interrupt dispatch overhead
fn bench_sh2_interrupts(c: &mut Criterion) {
    use saturn_rs::sh2::interrupt_source;

    let mut group = c.benchmark_group("sh2_interrupts");

    group.bench_function("send_and_dispatch", |b| {
        let (mut sh2, mut bus) = sh2_with_program(&[0x0009; 8]);
        bus.write32(0x40 * 4, PROGRAM_BASE);

        b.iter(|| {
            sh2.pc = PROGRAM_BASE;
            sh2.set_sr(0);
            sh2.is_interrupted = false;
            sh2.send_interrupt(black_box(interrupt_source::V_BLANK_IN));
            sh2.step(&mut bus);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sh2_instructions, bench_sh2_interrupts);
criterion_main!(benches);

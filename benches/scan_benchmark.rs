use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eosgen::scanner::Scanner;

fn synthetic_header(interfaces: usize) -> String {
    let mut text = String::new();
    for i in 0..interfaces {
        text.push_str(&format!(
            "#define EOS_IFACE{i}_DOTHING_API_LATEST 1\n\
             typedef struct EOS_Iface{i}Handle* EOS_HIface{i};\n\
             EOS_ENUM(EOS_EIface{i}Mode,\n\
             \tEOS_IM{i}_Off = 0,\n\
             \tEOS_IM{i}_On = 1\n\
             );\n\
             EOS_STRUCT(EOS_Iface{i}_DoThingOptions, (\n\
             \tint32_t ApiVersion;\n\
             \tEOS_ProductUserId LocalUserId;\n\
             \tuint32_t Amount;\n\
             ));\n\
             EOS_STRUCT(EOS_Iface{i}_DoThingCallbackInfo, (\n\
             \tEOS_EResult ResultCode;\n\
             \tvoid* ClientData;\n\
             ));\n\
             EOS_DECLARE_CALLBACK(EOS_Iface{i}_OnDoThingCallback, const EOS_Iface{i}_DoThingCallbackInfo* Data);\n\
             EOS_DECLARE_FUNC(void) EOS_Iface{i}_DoThing(EOS_HIface{i} Handle, const EOS_Iface{i}_DoThingOptions* Options, void* ClientData, const EOS_Iface{i}_OnDoThingCallback CompletionDelegate);\n"
        ));
    }
    text
}

fn scan_benchmark(c: &mut Criterion) {
    let text = synthetic_header(50);
    c.bench_function("scan_file_50_interfaces", |b| {
        b.iter(|| {
            let mut scanner = Scanner::new();
            black_box(scanner.scan_file("eos_bench_types.h", &text).unwrap());
        });
    });
}

criterion_group!(benches, scan_benchmark);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use safe_url::{
    add_or_replace_parameter, clean_url, safe_download_url, safe_url_string, Url, UrlParts,
};

criterion_group!(
    benches,
    bench_split,
    bench_parse_url,
    bench_safe_url,
    bench_safe_url_idna,
    bench_download,
    bench_clean,
    bench_add_or_replace,
    bench_join,
    bench_join_url,
);
criterion_main!(benches);

const SPLIT_CASE: &str = "https://user@example.com/search;p?q=%E6%B5%8B%E8%AF%95#fragment";
const SAFE_CASE: &str = "http://www.example.com/résumé 1/測試?q='a b'&r=µ#frag ment";
const IDNA_CASE: &str = "http://Bücher.example/München?x=1";
const DOWNLOAD_CASE: &str = "http://example.com/a/./b/../c/d e/../../f.txt#top";
const CLEAN_CASE: &str = "HTTP://WWW.Example.com:/a%2fb/%7euser?c=3&b=5&b=2&a=50#frag";
const RESOLVE_CASE_BASE: &str = "http://example.com/foo/bar";
const RESOLVE_CASE_REF: &str = "../baz";

fn bench_split(c: &mut Criterion) {
    c.bench_function("split", |b| {
        b.iter(|| UrlParts::split_with_params(black_box(SPLIT_CASE)))
    });
}

fn bench_parse_url(c: &mut Criterion) {
    c.bench_function("parse_url", |b| {
        b.iter(|| url::Url::parse(black_box(SPLIT_CASE)))
    });
}

fn bench_safe_url(c: &mut Criterion) {
    c.bench_function("safe_url", |b| b.iter(|| safe_url_string(black_box(SAFE_CASE))));
}

fn bench_safe_url_idna(c: &mut Criterion) {
    c.bench_function("safe_url_idna", |b| {
        b.iter(|| safe_url_string(black_box(IDNA_CASE)))
    });
}

fn bench_download(c: &mut Criterion) {
    c.bench_function("download", |b| {
        b.iter(|| safe_download_url(black_box(DOWNLOAD_CASE)))
    });
}

fn bench_clean(c: &mut Criterion) {
    c.bench_function("clean", |b| b.iter(|| clean_url(black_box(CLEAN_CASE))));
}

fn bench_add_or_replace(c: &mut Criterion) {
    c.bench_function("add_or_replace", |b| {
        b.iter(|| add_or_replace_parameter(black_box(CLEAN_CASE), [("b", "new"), ("d", "4")]))
    });
}

fn bench_join(c: &mut Criterion) {
    let base = Url::new(RESOLVE_CASE_BASE);
    c.bench_function("join", |b| b.iter(|| base.join(black_box(RESOLVE_CASE_REF))));
}

fn bench_join_url(c: &mut Criterion) {
    let base = url::Url::parse(RESOLVE_CASE_BASE).unwrap();
    c.bench_function("join_url", |b| {
        b.iter(|| base.join(black_box(RESOLVE_CASE_REF)))
    });
}

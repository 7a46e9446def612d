use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ngx_conf::{build, lexer::Lexer, parse_str, parser::Parser, BuildOptions};

// ============================================================================
// Test Data: Varying Complexity and Size
// ============================================================================

const TINY_CONF: &str = "worker_processes 4;";

const SMALL_CONF: &str = r#"events {
    worker_connections 1024;
}
http {
    server {
        listen 80;
        location / {
            return 200 "hello world";
        }
    }
}"#;

const MEDIUM_CONF: &str = r#"user nginx;
worker_processes auto;
error_log /var/log/nginx/error.log notice;
pid /var/run/nginx.pid;

events {
    worker_connections 4096; # per worker
    multi_accept on;
}

http {
    include /etc/nginx/mime.types;
    default_type application/octet-stream;

    log_format main '$remote_addr - $remote_user [$time_local] "$request" '
                    '$status $body_bytes_sent "$http_referer" '
                    '"$http_user_agent" "$http_x_forwarded_for"';

    access_log /var/log/nginx/access.log main;
    sendfile on;
    keepalive_timeout 65;

    upstream backend {
        least_conn;
        server 10.0.0.1:8080 weight=3;
        server 10.0.0.2:8080;
        server 10.0.0.3:8080 backup;
    }

    server {
        listen 443 ssl http2;
        server_name example.com www.example.com;
        ssl_certificate /etc/ssl/example.com.pem;
        ssl_certificate_key /etc/ssl/example.com.key;

        # API traffic
        location /api/ {
            proxy_pass http://backend;
            proxy_set_header Host $host;
            proxy_set_header X-Real-IP $remote_addr;
        }

        location ~* \.(png|jpg|css|js)$ {
            expires 30d;
            add_header Cache-Control "public, no-transform";
        }

        location / {
            try_files $uri $uri/ /index.html;
        }
    }
}"#;

// Generate a large config with many server blocks for stress testing
fn generate_servers(count: usize) -> String {
    let mut conf = String::from("http {\n");
    for i in 0..count {
        conf.push_str(&format!(
            "    server {{\n        listen {};\n        server_name host{}.example.com;\n        # upstream {}\n        location / {{ proxy_pass http://10.0.{}.1:8080; add_header X-Id 'server {}'; }}\n    }}\n",
            8000 + i,
            i,
            i,
            i % 255,
            i
        ));
    }
    conf.push('}');
    conf
}

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer_tiny(c: &mut Criterion) {
    c.bench_function("lexer_tiny", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(TINY_CONF));
            lexer.lex()
        })
    });
}

fn bench_lexer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_by_size");

    for (name, source) in [
        ("tiny", TINY_CONF),
        ("small", SMALL_CONF),
        ("medium", MEDIUM_CONF),
    ] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| {
                let mut lexer = Lexer::new(black_box(src));
                lexer.lex()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Parser Benchmarks
// ============================================================================

fn bench_parser_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_by_size");

    for (name, source) in [
        ("tiny", TINY_CONF),
        ("small", SMALL_CONF),
        ("medium", MEDIUM_CONF),
    ] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| {
                let mut parser = Parser::new(black_box(src));
                parser.parse_document()
            })
        });
    }

    group.finish();
}

fn bench_parser_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_server_scaling");

    for size in [10, 50, 100, 500, 1000] {
        let source = generate_servers(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| {
                let mut parser = Parser::new(black_box(src));
                parser.parse_document()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Builder Benchmarks
// ============================================================================

fn bench_builder_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder_server_scaling");
    let options = BuildOptions::default();

    for size in [10, 100, 1000] {
        let parsed = parse_str(&generate_servers(size)).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &parsed.nodes, |b, nodes| {
            b.iter(|| build(black_box(nodes), &options))
        });
    }

    group.finish();
}

// ============================================================================
// End-to-End Benchmarks
// ============================================================================

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    let options = BuildOptions::default();

    for (name, source) in [("small", SMALL_CONF), ("medium", MEDIUM_CONF)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| {
                let parsed = parse_str(black_box(src)).unwrap();
                let built = parsed.build(&options).unwrap();
                parse_str(&built)
            })
        });
    }

    group.finish();
}

fn bench_to_json(c: &mut Criterion) {
    let parsed = parse_str(MEDIUM_CONF).unwrap();
    c.bench_function("medium_to_json", |b| b.iter(|| black_box(&parsed).to_json()));
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(lexer_benches, bench_lexer_tiny, bench_lexer_sizes);

criterion_group!(parser_benches, bench_parser_sizes, bench_parser_scaling);

criterion_group!(builder_benches, bench_builder_scaling);

criterion_group!(e2e_benches, bench_round_trip, bench_to_json);

criterion_main!(lexer_benches, parser_benches, builder_benches, e2e_benches);

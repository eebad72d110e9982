use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fg_core::parsers::SwcProvider;
use fg_core::SourceCatalog;
use fg_typescript::{AnalysisPolicy, ApiInventoryBuilder, TypeScriptGraphBuilder};
use std::fs;
use tempfile::TempDir;

const SERVICES: usize = 40;

fn service_source(index: usize) -> String {
    format!(
        r#"import {{ Injectable }} from '@angular/core';

@Injectable({{ providedIn: 'root' }})
export class Feature{index}Service {{
  private apiUrl = 'https://api.example.com';

  constructor(private http: HttpClient, private logger: LoggerService) {{}}

  /** Loads feature {index} */
  load(id: string): Observable<Item> {{
    this.logger.log('load');
    return this.http.get<Item>(`${{this.apiUrl}}/features/{index}/${{id}}`);
  }}

  save(item: Item) {{
    const url = '/features/{index}';
    this.validate(item);
    return this.http.post(url, item);
  }}

  private validate(item: Item) {{
    return fetch('/validate', {{ method: 'POST', body: item }});
  }}
}}
"#
    )
}

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let app = dir.path().join("src/app");
    fs::create_dir_all(&app).expect("src dir");
    for index in 0..SERVICES {
        fs::write(
            app.join(format!("feature{}.service.ts", index)),
            service_source(index),
        )
        .expect("write service");
    }
    dir
}

fn bench_graph_building(c: &mut Criterion) {
    let dir = fixture();
    let policy = AnalysisPolicy::default();
    let provider = SwcProvider::new();
    let units = SourceCatalog::new(dir.path(), &policy.graph_extensions)
        .load(&provider)
        .expect("load units");

    c.bench_function("graph_build_parsed_units", |b| {
        let builder = TypeScriptGraphBuilder::new(&policy);
        b.iter(|| black_box(builder.build(&units)));
    });

    c.bench_function("graph_build_repository", |b| {
        let builder = TypeScriptGraphBuilder::new(&policy);
        b.iter(|| black_box(builder.build_repository(dir.path(), &provider)));
    });
}

fn bench_inventory(c: &mut Criterion) {
    let dir = fixture();
    let policy = AnalysisPolicy::default();
    let provider = SwcProvider::new();
    let units = SourceCatalog::new(dir.path(), &policy.inventory_extensions)
        .load(&provider)
        .expect("load units");
    let builder = ApiInventoryBuilder::new(&policy, Default::default());

    c.bench_function("inventory_build", |b| {
        b.iter(|| black_box(builder.build(&units)));
    });
}

criterion_group!(benches, bench_graph_building, bench_inventory);
criterion_main!(benches);

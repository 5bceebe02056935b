use crate::cli::TimelineArgs;
use crate::graph::{Bucketizer, GraphMediator, IntervalBucketizer};
use crate::style;

use super::CommandContext;

pub fn cmd_timeline(args: TimelineArgs) -> i32 {
    let ctx = match CommandContext::new(&args.records, &args.fields) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let granularity = ctx.options.granularity;
    let mut mediator = GraphMediator::new(ctx.options);
    if let Err(e) = mediator.evaluate(&ctx.records) {
        style::error(&format!("Failed to build graph: {}", e));
        return 1;
    }

    let all_dates = mediator
        .graph()
        .nodes
        .iter()
        .flat_map(|node| node.dates.iter())
        .chain(mediator.graph().links.iter().flat_map(|link| link.dates.iter()))
        .flatten()
        .copied();
    let Some(bucketizer) = IntervalBucketizer::spanning(all_dates, granularity) else {
        style::warning("No dated records; nothing to bucket");
        return 0;
    };

    let labels: Vec<String> = (0..bucketizer.num_buckets())
        .map(|bucket| bucketizer.bucket_label(bucket))
        .collect();
    mediator.set_bucketizer(Some(Box::new(bucketizer)));

    style::header("Timeline");
    let index = mediator.bucket_index();
    for (bucket, label) in labels.iter().enumerate() {
        println!(
            "{}",
            style::metric(
                label,
                format!(
                    "{} nodes, {} links",
                    index.node_counts[bucket], index.link_counts[bucket]
                )
            )
        );
    }
    0
}

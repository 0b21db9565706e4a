use crate::algorithms::graph_build::ConnectivityGraph;

/// Disjoint sets with path halving and union by rank.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        UnionFind { parent: (0..n as u32).collect(), rank: vec![0; n] }
    }

    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    /// Returns false when both were already in the same set.
    pub fn union(&mut self, a: u32, b: u32) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (ka, kb) = (self.rank[ra as usize], self.rank[rb as usize]);
        if ka < kb {
            self.parent[ra as usize] = rb;
        } else if ka > kb {
            self.parent[rb as usize] = ra;
        } else {
            self.parent[rb as usize] = ra;
            self.rank[ra as usize] = ka.saturating_add(1);
        }
        true
    }
}

/// Cluster label per input index. Ids are dense and numbered by each
/// cluster's smallest member, which is only meant to keep colors stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Clustering {
    labels: Vec<u32>,
    sizes: Vec<usize>,
}

impl Clustering {
    pub fn len(&self) -> usize { self.labels.len() }
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }
    pub fn cluster_count(&self) -> usize { self.sizes.len() }
    pub fn labels(&self) -> &[u32] { &self.labels }
    pub fn sizes(&self) -> &[usize] { &self.sizes }

    pub fn label(&self, index: u32) -> Option<u32> {
        self.labels.get(index as usize).copied()
    }

    pub fn members(&self, cluster: u32) -> Vec<u32> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i as u32)
            .collect()
    }

    pub fn clusters(&self) -> Vec<Vec<u32>> {
        let mut out: Vec<Vec<u32>> = self.sizes.iter().map(|&s| Vec::with_capacity(s)).collect();
        for (i, &l) in self.labels.iter().enumerate() {
            out[l as usize].push(i as u32);
        }
        out
    }
}

/// Connected components of a finished graph.
pub fn partition(graph: &ConnectivityGraph) -> Clustering {
    let n = graph.node_count();
    let mut uf = UnionFind::new(n);
    for &(a, b) in graph.edges() {
        uf.union(a, b);
    }
    let mut root_label: Vec<Option<u32>> = vec![None; n];
    let mut labels = Vec::with_capacity(n);
    let mut sizes: Vec<usize> = Vec::new();
    for i in 0..n as u32 {
        let root = uf.find(i) as usize;
        let label = match root_label[root] {
            Some(l) => l,
            None => {
                let l = sizes.len() as u32;
                root_label[root] = Some(l);
                sizes.push(0);
                l
            }
        };
        sizes[label as usize] += 1;
        labels.push(label);
    }
    tracing::debug!(nodes = n, clusters = sizes.len(), "partitioned");
    Clustering { labels, sizes }
}
